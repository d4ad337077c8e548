// src/core/picker.rs - Random choice among canned responses

/// Picks an index in `0..len`. `len` is never zero.
#[cfg_attr(test, mockall::automock)]
pub trait ResponsePicker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice backed by the OS random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl ResponsePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        let mut buf = [0u8; 8];
        if let Err(e) = getrandom::getrandom(&mut buf) {
            tracing::debug!("OS random source unavailable ({e}), using first response");
            return 0;
        }
        (u64::from_le_bytes(buf) % len as u64) as usize
    }
}

/// Always the first response.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPicker;

impl ResponsePicker for FirstPicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Choose one item from `items` with `picker`. `None` if empty.
pub fn choose<'a, T>(picker: &dyn ResponsePicker, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = picker.pick(items.len()).min(items.len() - 1);
    items.get(idx)
}
