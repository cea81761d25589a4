//! Join-all with per-item outcomes.
//!
//! Intra-invocation fan-out (per-recipient dispatch, per-mission actions)
//! is issued concurrently and joined here.  The contract: every future
//! runs to completion and reports its own result; a failure never cancels
//! or masks a sibling.

use std::future::Future;

use futures::future::join_all;

/// Await every future and collect each outcome.
pub async fn settle_all<T, E, F>(futures: Vec<F>) -> Vec<Result<T, E>>
where
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

/// `(ok, failed)` counts over settled outcomes.
pub fn tally<T, E>(results: &[Result<T, E>]) -> (usize, usize) {
    let ok = results.iter().filter(|r| r.is_ok()).count();
    (ok, results.len() - ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn outcome(fail: bool) -> Result<u32, &'static str> {
        if fail {
            Err("boom")
        } else {
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_mask_siblings() {
        let results = settle_all(vec![outcome(false), outcome(true), outcome(false)]).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(tally(&results), (2, 1));
    }

    #[tokio::test]
    async fn test_empty_settles_immediately() {
        let results: Vec<Result<u32, &'static str>> =
            settle_all(Vec::<std::future::Ready<Result<u32, &'static str>>>::new()).await;
        assert!(results.is_empty());
    }
}
