// Shared prompt fragments. Each flow that calls the completion service keeps
// its own prompts.rs alongside it and reuses these.

/// Instruction that pins the response to a bare JSON document.
pub const JSON_ONLY_INSTRUCTION: &str = "Return results ONLY in valid JSON. No extra text.";

/// Placeholder embedded when the caller supplied no job description.
pub const NOT_PROVIDED: &str = "Not provided";
