//! Provisioning queue: ordering, exclusive claims, terminal states.

use std::collections::HashSet;
use subscription_console::database::models::JobStatus;
use subscription_console::database::{self, jobs};

async fn fresh_pool() -> (tempfile::TempDir, database::DbPool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = database::connect(&dir.path().join("queue.db")).await.unwrap();
    (dir, pool)
}

#[tokio::test]
async fn claims_in_fifo_order() {
    let (_dir, pool) = fresh_pool().await;
    let first = jobs::enqueue(&pool, 10, 10, Some("alice"), "tg_10").await.unwrap();
    let second = jobs::enqueue(&pool, 11, 11, None, "tg_11").await.unwrap();

    let a = jobs::claim_next(&pool).await.unwrap().unwrap();
    let b = jobs::claim_next(&pool).await.unwrap().unwrap();
    assert_eq!((a.id, b.id), (first, second));
    assert_eq!(a.status, JobStatus::Running);
    assert!(a.started_at > 0);
    assert!(jobs::claim_next(&pool).await.unwrap().is_none());
}

#[tokio::test]
async fn active_job_tracks_pending_and_running_only() {
    let (_dir, pool) = fresh_pool().await;
    assert!(jobs::active_job_for(&pool, 7).await.unwrap().is_none());

    let id = jobs::enqueue(&pool, 7, 7, None, "tg_7").await.unwrap();
    assert_eq!(jobs::active_job_for(&pool, 7).await.unwrap().unwrap().id, id);

    jobs::claim_next(&pool).await.unwrap().unwrap();
    let running = jobs::active_job_for(&pool, 7).await.unwrap().unwrap();
    assert_eq!(running.status, JobStatus::Running);

    jobs::finish(&pool, id, true, "ok").await.unwrap();
    assert!(jobs::active_job_for(&pool, 7).await.unwrap().is_none());
}

#[tokio::test]
async fn finish_never_reverts_a_terminal_job() {
    let (_dir, pool) = fresh_pool().await;
    let id = jobs::enqueue(&pool, 1, 1, None, "tg_1").await.unwrap();
    jobs::claim_next(&pool).await.unwrap();

    assert!(jobs::finish(&pool, id, true, "created").await.unwrap());
    assert!(!jobs::finish(&pool, id, false, "late failure").await.unwrap());

    let job = jobs::get(&pool, id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.result_text, "created");
    assert!(job.finished_at > 0);
}

#[tokio::test]
async fn long_result_text_is_truncated() {
    let (_dir, pool) = fresh_pool().await;
    let id = jobs::enqueue(&pool, 1, 1, None, "tg_1").await.unwrap();
    jobs::claim_next(&pool).await.unwrap();
    jobs::finish(&pool, id, false, &"x".repeat(10_000)).await.unwrap();
    let job = jobs::get(&pool, id).await.unwrap().unwrap();
    assert_eq!(job.result_text.chars().count(), 4000);
}

#[tokio::test]
async fn interrupted_jobs_return_to_pending() {
    let (_dir, pool) = fresh_pool().await;
    let id = jobs::enqueue(&pool, 3, 3, None, "tg_3").await.unwrap();
    jobs::claim_next(&pool).await.unwrap().unwrap();
    assert!(jobs::claim_next(&pool).await.unwrap().is_none());

    assert_eq!(jobs::requeue_interrupted(&pool).await.unwrap(), 1);
    let again = jobs::claim_next(&pool).await.unwrap().unwrap();
    assert_eq!(again.id, id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claimers_never_share_a_job() {
    let (dir, pool) = fresh_pool().await;
    // A second pool on the same file stands in for another process.
    let other = database::connect(&dir.path().join("queue.db")).await.unwrap();
    let total = 40;
    for i in 0..total {
        jobs::enqueue(&pool, i, i, None, &format!("tg_{i}")).await.unwrap();
    }

    let mut handles = Vec::new();
    for worker in 0..6 {
        let pool = if worker % 2 == 0 { pool.clone() } else { other.clone() };
        handles.push(tokio::spawn(async move {
            let mut mine = Vec::new();
            while let Some(job) = jobs::claim_next(&pool).await.unwrap() {
                mine.push(job.id);
            }
            mine
        }));
    }

    let mut seen = HashSet::new();
    let mut claimed = 0;
    for handle in handles {
        for id in handle.await.unwrap() {
            claimed += 1;
            assert!(seen.insert(id), "job {id} claimed twice");
        }
    }
    assert_eq!(claimed, total as usize);
}
