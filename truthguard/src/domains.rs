use common::DomainsConfig;

/// Outlets treated as well-established news organizations.
pub const RELIABLE_DOMAINS: &[&str] = &[
    "reuters.com",
    "bbc.com",
    "npr.org",
    "apnews.com",
    "pbs.org",
    "cnn.com",
    "nytimes.com",
    "washingtonpost.com",
    "theguardian.com",
];

/// Outlets flagged for spreading misinformation.
pub const UNRELIABLE_DOMAINS: &[&str] = &[
    "fakenews.com",
    "conspiracy.net",
    "clickbait.org",
    "misleading.info",
];

/// Which list a domain fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClass {
    Reliable,
    Unreliable,
    Unknown,
}

impl DomainClass {
    /// Score the simulated confidence is centered on before noise.
    pub fn base_score(self) -> f64 {
        match self {
            DomainClass::Reliable => 85.0,
            DomainClass::Unreliable => 25.0,
            DomainClass::Unknown => 60.0,
        }
    }
}

/// Reliable / unreliable domain lists used for classification.
#[derive(Debug, Clone)]
pub struct DomainLists {
    reliable: Vec<String>,
    unreliable: Vec<String>,
}

impl Default for DomainLists {
    fn default() -> Self {
        Self::new(
            RELIABLE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            UNRELIABLE_DOMAINS.iter().map(|d| d.to_string()).collect(),
        )
    }
}

impl DomainLists {
    pub fn new(reliable: Vec<String>, unreliable: Vec<String>) -> Self {
        let normalize = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect()
        };
        Self {
            reliable: normalize(reliable),
            unreliable: normalize(unreliable),
        }
    }

    /// Built-in lists, with any list present in `[domains]` replacing its default.
    pub fn from_config(cfg: &DomainsConfig) -> Self {
        let defaults = Self::default();
        Self::new(
            cfg.reliable.clone().unwrap_or(defaults.reliable),
            cfg.unreliable.clone().unwrap_or(defaults.unreliable),
        )
    }

    /// Substring match on the lowercased hostname; the reliable list wins a tie.
    pub fn classify(&self, domain: &str) -> DomainClass {
        let domain = domain.to_ascii_lowercase();
        if self.reliable.iter().any(|d| domain.contains(d.as_str())) {
            DomainClass::Reliable
        } else if self.unreliable.iter().any(|d| domain.contains(d.as_str())) {
            DomainClass::Unreliable
        } else {
            DomainClass::Unknown
        }
    }

    pub fn reliable(&self) -> &[String] {
        &self.reliable
    }

    pub fn unreliable(&self) -> &[String] {
        &self.unreliable
    }
}
