pub mod chat;
pub mod client;
pub mod types;

pub use chat::GeminiChatClient;

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockBuilder};

    pub const GENERATE_CONTENT_PATH_REGEX: &str = r"/v1beta/models/.+:generateContent";

    pub fn post_path_regex(pattern: &str) -> MockBuilder {
        Mock::given(method("POST")).and(path_regex(pattern))
    }
}
