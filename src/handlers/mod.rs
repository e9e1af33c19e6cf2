//! The four AI-proxy handlers, each an instance of [`crate::proxy::ProxyHandler`].

pub mod chat_title;
pub mod description;
pub mod documentary;
pub mod lessons;

pub use chat_title::ChatTitle;
pub use description::ThreeDDescription;
pub use documentary::ProjectDocumentary;
pub use lessons::ProjectLessons;
