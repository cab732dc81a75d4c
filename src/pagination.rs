/// Items per page on every paginated listing.
pub const PAGE_SIZE: usize = 10;

/// Returns the 1-based `page` of `items`.
///
/// Pages past the end, and pages below 1, are empty rather than an error; the
/// caller decides whether an empty page means "not found".
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(PAGE_SIZE))
        .unwrap_or(usize::MAX);
    items.into_iter().skip(start).take(PAGE_SIZE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn first_page_holds_at_most_ten() {
        assert_eq!(paginate(numbers(25), 1), numbers(10));
        assert_eq!(paginate(numbers(4), 1), numbers(4));
    }

    #[test]
    fn last_page_is_partial() {
        assert_eq!(paginate(numbers(25), 3), vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        assert!(paginate(numbers(25), 4).is_empty());
        assert!(paginate(numbers(25), 0).is_empty());
        assert!(paginate(numbers(25), -3).is_empty());
        assert!(paginate(numbers(25), i64::MAX).is_empty());
        assert!(paginate(Vec::<usize>::new(), 1).is_empty());
    }
}
