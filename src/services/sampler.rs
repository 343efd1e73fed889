use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Video;

/// Maximum number of candidates considered per request
pub const MAX_POOL_SIZE: usize = 100;

/// Draws a duration-budgeted random sample from the candidate pool
///
/// Drops excluded videos and videos whose duration is not strictly under the
/// budget, shuffles what remains, caps the pool at [`MAX_POOL_SIZE`], then
/// accumulates in order: before each candidate the running duration total is
/// checked against the budget, and accumulation stops once it has been
/// exceeded. The check happens before the next item rather than after the
/// current one, so the batch may overshoot the budget by at most the duration
/// of its final video.
///
/// The RNG is injected so tests can seed it.
pub fn sample_within_budget<R: Rng>(
    mut pool: Vec<Video>,
    excluded: &HashSet<String>,
    budget_secs: i64,
    rng: &mut R,
) -> Vec<Video> {
    pool.retain(|video| !excluded.contains(&video.yt_id) && video.duration < budget_secs);
    pool.shuffle(rng);
    pool.truncate(MAX_POOL_SIZE);

    let mut sampled = Vec::new();
    let mut total = 0i64;

    for video in pool {
        if total > budget_secs {
            break;
        }
        total += video.duration;
        sampled.push(video);
    }

    sampled
}
