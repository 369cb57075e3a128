use std::sync::atomic::{AtomicU64, Ordering};

// Single monotonic counter shared by strokes and pasted regions, so the
// merged log has one unambiguous chronological order.
static NEXT_EDIT_ID: AtomicU64 = AtomicU64::new(1);

pub fn generate_id() -> u64 {
    NEXT_EDIT_ID.fetch_add(1, Ordering::SeqCst)
}
