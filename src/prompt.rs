use crate::signature::{render_signatures, ToolSignature};

/// Renders the ReAct format instructions. Field order and wording are kept
/// stable for models tuned on this layout.
pub fn format_instructions(signatures: &[ToolSignature]) -> String {
    format!(
        "Use the following format:\n\
         \n\
         Question: the input question you must answer\n\
         Thought: you should always think about what to do\n\
         Action: the action to take, should be one of [{}].\n\
         Observation: the result of the action\n\
         ... (this Thought/Action/Observation can repeat N times)\n\
         Thought: I now know the final answer\n\
         Final Answer: the final answer to the original input question",
        render_signatures(signatures)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_actions_in_order() {
        let prompt = format_instructions(&[
            ToolSignature::new("get_weather", ["city"]),
            ToolSignature::bare("get_current_city"),
        ]);

        assert!(prompt.contains(
            "Action: the action to take, should be one of [get_weather[city], get_current_city[]]."
        ));
    }

    #[test]
    fn keeps_header_order() {
        let prompt = format_instructions(&[]);
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(lines[0], "Use the following format:");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("Question:"));
        assert!(lines[3].starts_with("Thought:"));
        assert_eq!(lines[4], "Action: the action to take, should be one of [].");
        assert!(lines[5].starts_with("Observation:"));
        assert!(lines[8].starts_with("Final Answer:"));
    }
}
