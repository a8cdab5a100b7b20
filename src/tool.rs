use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};

use crate::error::{AgentError, Result};
use crate::signature::ToolSignature;

/// A named action the agent can dispatch. Tools take one optional text
/// argument (the bracket content of the action) and return an observation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Declared parameter names, used only for the instruction prompt.
    fn parameters(&self) -> Vec<String> {
        Vec::new()
    }

    fn signature(&self) -> ToolSignature {
        ToolSignature::new(self.name(), self.parameters())
    }

    async fn call(&self, input: Option<String>) -> Result<String>;
}

type ToolHandler = Box<dyn Fn(Option<String>) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Adapts a closure into a [`Tool`]. Synchronous and asynchronous closures
/// end up behind the same boxed future.
pub struct FnTool {
    signature: ToolSignature,
    handler: ToolHandler,
}

impl FnTool {
    pub fn new<F, Fut>(signature: ToolSignature, handler: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            signature,
            handler: Box::new(move |input: Option<String>| handler(input).boxed()),
        }
    }

    pub fn sync<F>(signature: ToolSignature, handler: F) -> Self
    where
        F: Fn(Option<&str>) -> String + Send + Sync + 'static,
    {
        Self {
            signature,
            handler: Box::new(move |input: Option<String>| {
                future::ready(Ok::<_, AgentError>(handler(input.as_deref()))).boxed()
            }),
        }
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("signature", &self.signature)
            .finish()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.signature.name
    }

    fn parameters(&self) -> Vec<String> {
        self.signature.parameter_names.clone()
    }

    async fn call(&self, input: Option<String>) -> Result<String> {
        (self.handler)(input).await
    }
}

/// Action name to tool mapping. Registration order is kept so the rendered
/// action list is stable.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn register_fn<F, Fut>(&mut self, name: &str, parameters: &[&str], handler: F)
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        self.register(FnTool::new(
            ToolSignature::new(name, parameters.iter().copied()),
            handler,
        ));
    }

    pub fn register_sync<F>(&mut self, name: &str, parameters: &[&str], handler: F)
    where
        F: Fn(Option<&str>) -> String + Send + Sync + 'static,
    {
        self.register(FnTool::sync(
            ToolSignature::new(name, parameters.iter().copied()),
            handler,
        ));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn signatures(&self) -> Vec<ToolSignature> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.signature())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub async fn call(&self, name: &str, input: Option<String>) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::UnknownAction(name.to_string()))?;
        tool.call(input)
            .await
            .map_err(|source| AgentError::ToolInvocation {
                name: name.to_string(),
                source: Box::new(source),
            })
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn parameters(&self) -> Vec<String> {
            vec!["text".into()]
        }

        async fn call(&self, input: Option<String>) -> Result<String> {
            Ok(input.unwrap_or_default().to_uppercase())
        }
    }

    #[tokio::test]
    async fn sync_and_async_tools_are_called_alike() {
        let mut tools = ToolRegistry::new();
        tools.register(Upper);
        tools.register_sync("len", &["text"], |input| {
            input.map(str::len).unwrap_or(0).to_string()
        });
        tools.register_fn("where", &[], |_| async { Ok("Auckland".to_string()) });

        assert_eq!(tools.call("upper", Some("hi".into())).await.unwrap(), "HI");
        assert_eq!(tools.call("len", Some("four".into())).await.unwrap(), "4");
        assert_eq!(tools.call("len", None).await.unwrap(), "0");
        assert_eq!(tools.call("where", None).await.unwrap(), "Auckland");
    }

    #[tokio::test]
    async fn unknown_name_is_an_unknown_action() {
        let tools = ToolRegistry::new();
        let err = tools.call("nope", None).await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownAction(name) if name == "nope"));
    }

    #[tokio::test]
    async fn tool_failures_are_wrapped() {
        let mut tools = ToolRegistry::new();
        tools.register_fn("boom", &[], |_| async {
            Err(AgentError::LanguageModel("unreachable backend".into()))
        });

        let err = tools.call("boom", None).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolInvocation { ref name, .. } if name == "boom"));
    }

    #[test]
    fn keeps_registration_order_and_replaces_in_place() {
        let mut tools = ToolRegistry::new();
        tools.register_sync("b", &["x"], |_| String::new());
        tools.register_sync("a", &[], |_| String::new());
        tools.register_sync("b", &["y", "z"], |_| String::new());

        assert_eq!(tools.names(), vec!["b".to_string(), "a".to_string()]);
        let rendered: Vec<String> = tools.signatures().iter().map(|s| s.render()).collect();
        assert_eq!(rendered, vec!["b[y,z]", "a[]"]);
        assert_eq!(tools.len(), 2);
    }
}
