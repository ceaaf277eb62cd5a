use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Lifetime of a screen or session. Work started through a scope is abandoned
/// as soon as the scope is cancelled or dropped.
#[derive(Debug)]
pub struct Scope {
    token: CancellationToken,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A scope that is cancelled together with this one, but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Scope {
        Scope {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        run_until_cancelled(&self.token, fut).await
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

pub async fn run_until_cancelled<T, F>(token: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled),
        out = fut => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let scope = Scope::new();
        let out = scope.run(async { Ok(7) }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn parent_cancel_reaches_child_work() {
        let parent = Scope::new();
        let child = parent.child();
        let token = parent.token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });
        let out: Result<()> = child
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await;
        assert!(matches!(out, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn dropping_a_child_leaves_the_parent_alive() {
        let parent = Scope::new();
        drop(parent.child());
        assert!(!parent.is_cancelled());
        let token = parent.token();
        drop(parent);
        assert!(token.is_cancelled());
    }
}
