//! State for the "new research topic" dialog.
//!
//! Only the state transitions live here; rendering is left to the caller.

pub const SUGGESTED_TOPICS: &[&str] = &[
    "Protein folding with machine learning",
    "Low-cost water desalination",
    "Battery chemistry beyond lithium-ion",
    "Microplastics in urban soil",
    "Exoplanet atmosphere detection",
    "CRISPR off-target effects",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopicCollector {
    open: bool,
    topic: String,
}

impl TopicCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        SUGGESTED_TOPICS
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    /// Copy a suggestion into the topic field. Returns `false` for an
    /// out-of-range index and leaves the field untouched.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        match SUGGESTED_TOPICS.get(index) {
            Some(suggestion) => {
                self.topic = (*suggestion).to_string();
                true
            }
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// Hand the trimmed topic to `on_submit`, then reset and close.
    ///
    /// A blank topic is a no-op and the callback is never invoked.
    pub fn submit<F>(&mut self, on_submit: F) -> bool
    where
        F: FnOnce(String),
    {
        if !self.can_submit() {
            return false;
        }

        let topic = self.topic.trim().to_string();
        tracing::debug!("Submitting topic '{}'", topic);
        on_submit(topic);

        self.topic.clear();
        self.open = false;
        true
    }

    /// Close without submitting. The typed topic survives for the next open.
    pub fn cancel(&mut self) {
        self.open = false;
    }
}
