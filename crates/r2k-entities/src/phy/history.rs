/// Keep a history of the past N per-bit measurements
pub struct History<const N: usize> {
    buffer: [f64; N],
    /// Index where latest sample has been written
    index: usize,
    /// Samples written so far, saturating at N
    filled: usize,
}

impl<const N: usize> History<N> {
    pub fn new() -> Self {
        Self { buffer: [0.0; N], index: 0, filled: 0 }
    }

    pub fn write(&mut self, sample: f64) {
        self.index = (self.index + 1) % N;
        self.buffer[self.index] = sample;
        self.filled = (self.filled + 1).min(N);
    }

    /// Get a sample with a given delay
    pub fn delayed(&self, delay: usize) -> f64 {
        assert!(delay < N);
        self.buffer[(self.index + N - delay) % N]
    }

    /// Mean over the whole window. Samples not yet written count as zero.
    pub fn average(&self) -> f64 {
        self.buffer.iter().sum::<f64>() / N as f64
    }

    pub fn is_filled(&self) -> bool {
        self.filled == N
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_over_window() {
        let mut h = History::<4>::new();
        h.write(1.0);
        h.write(1.0);
        assert_eq!(h.average(), 0.5);
        assert!(!h.is_filled());
        for _ in 0..4 {
            h.write(0.25);
        }
        assert!(h.is_filled());
        assert_eq!(h.average(), 0.25);
        h.write(1.0);
        assert_eq!(h.delayed(0), 1.0);
        assert_eq!(h.delayed(1), 0.25);
    }
}
