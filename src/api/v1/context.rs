use nanoid::nanoid;

const REQUEST_ID_ALPHABET: [char; 16] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// Per-request values threaded explicitly through the handlers; nothing
/// request-scoped lives in global state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        RequestContext {
            request_id: nanoid!(10, &REQUEST_ID_ALPHABET),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
