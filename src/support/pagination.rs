/// `skip`/`take` window over an ordered collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub skip: usize,
    /// `None` = everything after `skip`
    pub take: Option<usize>,
}

impl Window {
    pub fn new(skip: usize, take: Option<usize>) -> Self {
        Self { skip, take }
    }

    pub fn all() -> Self {
        Self::default()
    }

    /// Apply the window to an iterator
    pub fn apply<I: IntoIterator>(&self, items: I) -> Vec<I::Item> {
        let iter = items.into_iter().skip(self.skip);
        match self.take {
            Some(take) => iter.take(take).collect(),
            None => iter.collect(),
        }
    }
}

/// A windowed slice plus the size of the full collection
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Paged<T> {
    pub fn from_all(all: Vec<T>, window: Window) -> Self {
        let total = all.len();
        Self {
            items: window.apply(all),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_selects_contiguous_range() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(Window::new(1, Some(2)).apply(items.clone()), vec![2, 3]);
        assert_eq!(Window::new(4, None).apply(items.clone()), vec![5]);
        assert!(Window::new(9, Some(3)).apply(items).is_empty());
    }

    #[test]
    fn total_is_independent_of_window() {
        let paged = Paged::from_all(vec!['a', 'b', 'c'], Window::new(0, Some(0)));
        assert!(paged.items.is_empty());
        assert_eq!(paged.total, 3);
    }
}
