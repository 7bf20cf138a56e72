use rand::Rng;
use types::Message;

/// Clear the seen flag on every message, starting a new rotation cycle.
pub fn reset_cycle(messages: &mut [Message]) {
    for message in messages.iter_mut() {
        message.has_been_seen = false;
    }
}

/// Pick the next message to display after `current`.
///
/// Candidates are messages with a different title that have not been seen
/// in this cycle. When none remain the cycle is reset and the choice is
/// made among every other title. A collection with no other title (a
/// single message) keeps `current`.
///
/// The chosen message is marked as seen. Returns its index.
pub fn select_next<R: Rng + ?Sized>(
    current: usize,
    messages: &mut [Message],
    rng: &mut R,
) -> usize {
    let Some(current_title) = messages.get(current).map(|m| m.title.clone())
    else {
        return current;
    };

    let mut candidates = collect_candidates(&current_title, messages, true);

    if candidates.is_empty() {
        reset_cycle(messages);
        candidates = collect_candidates(&current_title, messages, false);
    }

    if candidates.is_empty() {
        return current;
    }

    let next = candidates[rng.random_range(0..candidates.len())];
    messages[next].has_been_seen = true;
    next
}

fn collect_candidates(
    current_title: &str,
    messages: &[Message],
    unseen_only: bool,
) -> Vec<usize> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.title != current_title)
        .filter(|(_, m)| !unseen_only || !m.has_been_seen)
        .map(|(index, _)| index)
        .collect()
}
