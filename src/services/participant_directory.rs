use std::collections::HashMap;

/// Static name → code table used for login.
#[derive(Debug, Clone, Default)]
pub struct ParticipantDirectory {
    codes: HashMap<String, String>,
}

impl ParticipantDirectory {
    pub fn new(codes: HashMap<String, String>) -> Self {
        Self { codes }
    }

    /// Exact, case-sensitive match of both name and code.
    pub fn validate(&self, name: &str, code: &str) -> bool {
        self.codes.get(name).is_some_and(|stored| stored == code)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}
