//! Tool registry and invocation dispatch
//!
//! Tools are callable functions exposed to the language model: each carries
//! a name, a description, a typed parameter schema, and an async handler.
//! The registry holds them; the invoker validates model-issued calls and
//! runs them, folding failures back into the conversation instead of
//! letting them fault the session.

pub mod builtin;
pub mod invoker;
pub mod registry;
pub mod schema;

pub use builtin::{builtin_registry, Clock, ClockTool, FixedClock, SystemClock, WeatherTool};
pub use invoker::{RecordedCall, ToolCallResult, ToolCallTracker, ToolFault, ToolInvoker};
pub use registry::{RegistrationError, ToolRegistry};
pub use schema::{InputSchema, ParamSpec, ParamType, Tool, ToolContext, ToolError, ToolSchema};
