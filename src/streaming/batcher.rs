use std::mem;

/// A full or drained group of records, ready for one bulk send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<R> {
    records: Vec<R>,
}

impl<R> Batch<R> {
    fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Accumulates records into fixed-size batches.
///
/// A single accumulator owns the one batch in preparation; `add` hands a
/// full batch back the moment the capacity is reached, and `drain` closes
/// out the remainder at end-of-stream.
#[derive(Debug)]
pub struct BatchAccumulator<R> {
    capacity: usize,
    buffer: Vec<R>,
}

impl<R> BatchAccumulator<R> {
    /// Create an accumulator producing batches of `capacity` records.
    /// Capacities below 1 are clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Append one record, returning the batch if it just became full.
    pub fn add(&mut self, record: R) -> Option<Batch<R>> {
        self.buffer.push(record);
        if self.buffer.len() >= self.capacity {
            let records = mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity));
            Some(Batch::new(records))
        } else {
            None
        }
    }

    /// Take whatever is buffered as a final, possibly smaller batch.
    pub fn drain(&mut self) -> Option<Batch<R>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(Batch::new(mem::take(&mut self.buffer)))
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_batch_exactly_at_capacity() {
        let mut accumulator = BatchAccumulator::new(2);

        assert!(accumulator.add("r1").is_none());
        let batch = accumulator.add("r2").expect("batch at capacity");
        assert_eq!(batch.records(), &["r1", "r2"]);

        assert!(accumulator.add("r3").is_none());
        assert_eq!(accumulator.len(), 1);
    }

    #[test]
    fn drain_returns_partial_remainder() {
        let mut accumulator = BatchAccumulator::new(2);
        accumulator.add("r1");
        accumulator.add("r2");
        accumulator.add("r3");

        let batch = accumulator.drain().expect("remainder");
        assert_eq!(batch.records(), &["r3"]);
        assert!(accumulator.is_empty());
    }

    #[test]
    fn drain_on_empty_returns_none() {
        let mut accumulator = BatchAccumulator::<&str>::new(2);
        assert!(accumulator.drain().is_none());
    }

    #[test]
    fn preserves_insertion_order() {
        let mut accumulator = BatchAccumulator::new(3);
        accumulator.add(1);
        accumulator.add(2);
        let batch = accumulator.add(3).unwrap();

        assert_eq!(batch.into_records(), vec![1, 2, 3]);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut accumulator = BatchAccumulator::new(0);
        assert_eq!(accumulator.capacity(), 1);

        let batch = accumulator.add("r1").expect("single-record batch");
        assert_eq!(batch.len(), 1);
    }
}
