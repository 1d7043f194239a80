use crate::api::ComplaintClient;
use crate::models::Stats;
use crate::views::Notice;

pub struct HomeView {
    client: ComplaintClient,
    pub stats: Stats,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl HomeView {
    pub fn new(client: ComplaintClient) -> Self {
        Self {
            client,
            stats: Stats::default(),
            loading: false,
            notice: None,
        }
    }

    /// Fetch the status counters. The page is decorative, so a failure keeps
    /// the last known (initially zero) counters and is only logged.
    pub async fn load(&mut self) {
        if self.loading {
            self.notice = Some(Notice::Error("Counters are already loading".to_string()));
            return;
        }
        self.loading = true;
        match self.client.stats().await {
            Ok(stats) => self.stats = stats,
            Err(e) => tracing::error!("Error fetching stats: {}", e),
        }
        self.loading = false;
    }
}
