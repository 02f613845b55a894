use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One requested execution of a named tool.
///
/// `arguments` may carry `$<id>.result` placeholders; the scheduler never looks
/// at them; only `dependencies` drives ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub invocation_id: String,
    pub tool_name: String,
    #[serde(default, alias = "parameters")]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ToolInvocation {
    pub fn new(invocation_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            tool_name: tool_name.into(),
            arguments: Map::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Replace the argument map. Non-object values are ignored.
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        if let Value::Object(map) = arguments {
            self.arguments = map;
        }
        self
    }

    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }
}

/// Common invocation interface for dependency graph handling.
pub trait InvocationLike: Clone + Send + Sync {
    fn id(&self) -> &str;
    fn dependencies(&self) -> &[String];
}

impl InvocationLike for ToolInvocation {
    fn id(&self) -> &str {
        &self.invocation_id
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}
