use std::fmt;

/// Declared name and parameter list of a tool, rendered into the instructions
/// as `name[arg1,arg2]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolSignature {
    pub name: String,
    pub parameter_names: Vec<String>,
}

impl ToolSignature {
    pub fn new<I, S>(name: impl Into<String>, parameter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameter_names: parameter_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_names: Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let params: Vec<String> = self
            .parameter_names
            .iter()
            .map(|p| p.chars().filter(|c| !c.is_whitespace()).collect())
            .filter(|p: &String| !p.is_empty())
            .collect();
        format!("{}[{}]", self.name, params.join(","))
    }
}

impl fmt::Display for ToolSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Joins signatures the way the action list in the instructions expects them.
pub fn render_signatures<'a>(signatures: impl IntoIterator<Item = &'a ToolSignature>) -> String {
    signatures
        .into_iter()
        .map(ToolSignature::render)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_spaces() {
        let sig = ToolSignature::new("get_weather", ["city", " day "]);
        assert_eq!(sig.render(), "get_weather[city,day]");
    }

    #[test]
    fn missing_parameters_render_empty_brackets() {
        assert_eq!(ToolSignature::bare("get_current_city").render(), "get_current_city[]");
        assert_eq!(ToolSignature::new("noop", [""]).to_string(), "noop[]");
    }

    #[test]
    fn joins_with_comma_and_space() {
        let sigs = vec![
            ToolSignature::new("get_weather", ["city"]),
            ToolSignature::bare("get_current_city"),
        ];
        assert_eq!(
            render_signatures(&sigs),
            "get_weather[city], get_current_city[]"
        );
    }
}
