/// Fixed-capacity history that keeps the newest `capacity` samples.
///
/// Storage is allocated once; once full, each push overwrites the oldest slot in place.
#[derive(Clone, Debug)]
pub struct TrailRing<T> {
    slots: Vec<T>,
    capacity: usize,
    newest: usize,
}

impl<T: Copy> TrailRing<T> {
    /// A ring holding at most `capacity` samples (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            newest: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn push_front(&mut self, sample: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(sample);
            self.newest = self.slots.len() - 1;
        } else {
            self.newest = (self.newest + 1) % self.capacity;
            self.slots[self.newest] = sample;
        }
    }

    pub fn newest(&self) -> Option<T> {
        self.slots.get(self.newest).copied()
    }

    /// Samples from newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        let len = self.slots.len();
        (0..len).map(move |i| self.slots[(self.newest + len - i) % len])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/trail.rs"]
mod tests;
