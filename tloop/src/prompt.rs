//! Prompt templates for the tool-calling protocol.
//!
//! ```rust
//! use tloop::{build_system_prompt, build_tool_result_message, combine_prompts};
//!
//! let system = build_system_prompt(&[]);
//! assert!(system.contains("Available tools:\n[]"));
//!
//! let observation = build_tool_result_message("add", "5");
//! assert!(observation.starts_with("Tool 'add' returned:\n5"));
//!
//! assert_eq!(combine_prompts("rules", "hi"), "rules\n\n---\n\nUser: hi");
//! ```

use ttooling::ToolSchema;

use crate::parser::{TOOL_CALL_CLOSE, TOOL_CALL_OPEN};

pub fn build_system_prompt(schemas: &[ToolSchema]) -> String {
    let tools_json = serde_json::to_string_pretty(schemas).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a helpful assistant with access to tools. You can call tools by responding ONLY in this exact format:

{TOOL_CALL_OPEN}
{{\"name\": \"tool_name\", \"arguments\": {{\"arg1\": \"value1\", \"arg2\": \"value2\"}}}}
{TOOL_CALL_CLOSE}

IMPORTANT RULES:
1. Use ONLY the exact tool names provided below
2. Provide ALL required arguments with correct types
3. Arguments must be valid JSON values
4. Only make ONE tool call at a time
5. If no tool is needed, respond normally without the {TOOL_CALL_OPEN} tags

Available tools:
{tools_json}

When you receive a tool result, use it to formulate your final response to the user."
    )
}

pub fn build_tool_result_message(tool_name: &str, result: &str) -> String {
    format!(
        "Tool '{tool_name}' returned:\n{result}\n\nNow provide your final answer based on this result, or call another tool if you still need more information."
    )
}

pub fn build_tool_not_found_message(tool_name: &str, available: &[String]) -> String {
    let listed = if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    };

    format!(
        "Error: Tool '{tool_name}' does not exist. Available tools are: {listed}. Please try again with a valid tool or respond without using tools."
    )
}

pub fn build_tool_error_message(tool_name: &str, error: &str) -> String {
    format!(
        "Error calling tool '{tool_name}': {error}\n\nPlease try a different approach or respond without using tools."
    )
}

/// Folds the system instruction into a single user message for models that
/// reject a separate system role.
pub fn combine_prompts(system: &str, user: &str) -> String {
    format!("{system}\n\n---\n\nUser: {user}")
}
