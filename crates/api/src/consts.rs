/// Maximum length for free text sent to the model (sentences, answers, prompts)
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Maximum length for identifiers and short labels (user id, language, mode, ...)
pub const MAX_LABEL_LENGTH: usize = 255;

/// Maximum number of practice items generated in one request
pub const MAX_CONTENT_ITEMS: u32 = 20;

/// Items generated when the request does not say
pub const DEFAULT_CONTENT_ITEMS: u32 = 5;

/// Page size for admin list endpoints when `limit` is omitted
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Largest page size accepted by admin list and summary endpoints
pub const MAX_LIST_LIMIT: usize = 1000;
