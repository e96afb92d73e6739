use crc32fast::Hasher;

/// Derive a stable seed for element ids from a page id using CRC32
pub fn page_seed(page_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(page_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for elements within a page
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Page seed (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(page_id: &str) -> Self {
        Self {
            seed: page_seed(page_id),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance past an id loaded from disk so it is never handed out again
    pub fn observe(&mut self, id: &str) {
        let suffix = id
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u32>().ok());

        if let Some(n) = suffix {
            self.count = self.count.max(n);
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
