use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Default)]
struct NoticeInner {
    message: Option<String>,
    generation: u64,
    clear_task: Option<JoinHandle<()>>,
}

impl NoticeInner {
    fn replace(&mut self, message: Option<String>) -> u64 {
        if let Some(task) = self.clear_task.take() {
            task.abort();
        }
        self.message = message;
        self.generation += 1;
        self.generation
    }
}

/// Status line shown next to the microphone.
///
/// A new message replaces the old one and cancels its pending clear. Flash
/// messages clear themselves after a delay; everything clears on drop.
pub struct StatusNotice {
    inner: Arc<Mutex<NoticeInner>>,
}

impl StatusNotice {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NoticeInner::default())),
        }
    }

    /// Show a message until it is replaced
    pub async fn show(&self, message: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.replace(Some(message.into()));
    }

    /// Show a message and clear it after `ttl`
    pub async fn flash(&self, message: impl Into<String>, ttl: Duration) {
        let mut inner = self.inner.lock().await;
        let generation = inner.replace(Some(message.into()));

        let weak: Weak<Mutex<NoticeInner>> = Arc::downgrade(&self.inner);
        inner.clear_task = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().await;
                // Only clear if nothing newer was posted meanwhile
                if inner.generation == generation {
                    inner.message = None;
                    inner.clear_task = None;
                }
            }
        }));
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.replace(None);
    }

    pub async fn current(&self) -> Option<String> {
        self.inner.lock().await.message.clone()
    }
}

impl Default for StatusNotice {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StatusNotice {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_lock() {
            inner.replace(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_flash_clears_after_ttl() {
        let notice = StatusNotice::new();
        notice.flash("Summary saved", Duration::from_secs(2)).await;
        assert_eq!(notice.current().await.as_deref(), Some("Summary saved"));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(notice.current().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_survives_old_timer() {
        let notice = StatusNotice::new();
        notice.flash("first", Duration::from_secs(1)).await;
        notice.show("second").await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(notice.current().await.as_deref(), Some("second"));
    }
}
