/// Where the definitive resource representation lives once an LRO completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalStateVia {
    #[default]
    AzureAsyncOperation,
    Location,
    OriginalUri,
    OperationLocation,
}

impl FinalStateVia {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalStateVia::AzureAsyncOperation => "azure-async-operation",
            FinalStateVia::Location => "location",
            FinalStateVia::OriginalUri => "original-uri",
            FinalStateVia::OperationLocation => "operation-location",
        }
    }
}

/// Status routing and LRO policy of one command.
///
/// Omitting the `lro` block entirely disables polling; writing one (even an
/// empty one) enables it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LroOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, alias = "final-state-via")]
    pub final_state_via: FinalStateVia,
    /// Codes that complete synchronously unless they carry an async marker.
    #[serde(default = "default_sync_statuses")]
    pub sync_statuses: Vec<u16>,
    /// Codes that always start polling.
    #[serde(default = "default_async_statuses")]
    pub async_statuses: Vec<u16>,
}

impl Default for LroOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            final_state_via: FinalStateVia::default(),
            sync_statuses: default_sync_statuses(),
            async_statuses: default_async_statuses(),
        }
    }
}

impl LroOptions {
    pub fn polling(final_state_via: FinalStateVia) -> Self {
        Self {
            enabled: true,
            final_state_via,
            ..Self::default()
        }
    }

    pub fn is_sync_status(&self, status: u16) -> bool {
        self.sync_statuses.contains(&status)
    }

    pub fn is_async_status(&self, status: u16) -> bool {
        self.enabled && self.async_statuses.contains(&status)
    }
}

fn default_true() -> bool {
    true
}

fn default_sync_statuses() -> Vec<u16> {
    vec![200, 201, 204]
}

fn default_async_statuses() -> Vec<u16> {
    vec![202]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PollState {
    Running,
    Succeeded,
    Failed,
    Canceled,
}

impl PollState {
    /// Maps a server-reported status string. Anything that is not one of the
    /// terminal names (`InProgress`, `Accepted`, `Updating`, ...) is running.
    pub fn parse(status: &str) -> Self {
        let s = status.trim();
        if s.eq_ignore_ascii_case("succeeded") {
            PollState::Succeeded
        } else if s.eq_ignore_ascii_case("failed") {
            PollState::Failed
        } else if s.eq_ignore_ascii_case("canceled") || s.eq_ignore_ascii_case("cancelled") {
            PollState::Canceled
        } else {
            PollState::Running
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PollState::Running => "Running",
            PollState::Succeeded => "Succeeded",
            PollState::Failed => "Failed",
            PollState::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
