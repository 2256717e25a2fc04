pub const PROMPT: &str = "url> ";
pub const LOADING_TEXT: &str = "Loading...";
pub const RESULTS_HEADER: &str = "=== Results ===";
pub const LABEL_URL: &str = "Original URL";
pub const LABEL_TITLE: &str = "Page Title";
pub const LABEL_SANDBOX: &str = "Sandbox";
pub const LABEL_HEIGHT: &str = "Height";
pub const LABEL_LINKS: &str = "Links rewritten";
pub const UNKNOWN_GEOMETRY: &str = "unknown";
