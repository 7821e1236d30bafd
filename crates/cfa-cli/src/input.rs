//! Input loading: CSV feedback files and the built-in demo dataset.

use std::path::Path;

use anyhow::Context;

use cfa_core::Review;

/// The built-in demo dataset, for trying the analyzer without a CSV file.
pub(crate) fn demo_reviews() -> Vec<Review> {
    [
        (4521, "Car was clean but pickup took too long", 3.0),
        (6723, "Excellent service! Will rent again", 5.0),
        (2891, "Vehicle had maintenance issues", 2.0),
        (3452, "Great experience overall", 4.0),
        (7834, "Staff was rude and unhelpful", 1.0),
    ]
    .into_iter()
    .map(|(id, text, rating)| Review {
        id: Some(id),
        text: text.to_owned(),
        rating: Some(rating),
    })
    .collect()
}

/// Loads reviews from a CSV file.
///
/// The `review` column is required and its absence is a fatal load error,
/// surfaced before any analysis starts. `customer_id` and `rating` are
/// optional; unparseable values in them are tolerated and dropped. Rows
/// with blank review text are kept so the batch runner can record them as
/// input failures in the failure summary.
pub(crate) fn load_reviews_csv(path: &Path) -> anyhow::Result<Vec<Review>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open input CSV {}", path.display()))?;

    let headers = reader.headers().context("cannot read CSV headers")?.clone();
    let review_col = headers
        .iter()
        .position(|h| h == "review")
        .ok_or_else(|| anyhow::anyhow!("input CSV has no 'review' column"))?;
    let id_col = headers.iter().position(|h| h == "customer_id");
    let rating_col = headers.iter().position(|h| h == "rating");

    let mut reviews = Vec::new();
    for (row, record) in reader.records().enumerate() {
        // Header is line 1, so the first record is line 2.
        let record = record.with_context(|| format!("malformed CSV record at line {}", row + 2))?;
        let text = record.get(review_col).unwrap_or_default().to_owned();
        let id = id_col
            .and_then(|col| record.get(col))
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        let rating = rating_col
            .and_then(|col| record.get(col))
            .and_then(|raw| raw.trim().parse::<f64>().ok());
        reviews.push(Review { id, text, rating });
    }

    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn loads_all_columns() {
        let file = csv_file(
            "customer_id,review,rating\n\
             4521,Car was clean but pickup took too long,3\n\
             6723,Excellent service! Will rent again,5\n",
        );
        let reviews = load_reviews_csv(file.path()).unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id, Some(4521));
        assert_eq!(reviews[0].text, "Car was clean but pickup took too long");
        assert_eq!(reviews[0].rating, Some(3.0));
    }

    #[test]
    fn review_column_alone_is_enough() {
        let file = csv_file("review\nGreat experience overall\n");
        let reviews = load_reviews_csv(file.path()).unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id, None);
        assert_eq!(reviews[0].rating, None);
    }

    #[test]
    fn missing_review_column_is_a_load_error() {
        let file = csv_file("customer_id,rating\n1,5\n");
        let err = load_reviews_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("no 'review' column"));
    }

    #[test]
    fn unparseable_id_and_rating_are_dropped() {
        let file = csv_file("customer_id,review,rating\nnot-a-number,Fine car,N/A\n");
        let reviews = load_reviews_csv(file.path()).unwrap();

        assert_eq!(reviews[0].id, None);
        assert_eq!(reviews[0].rating, None);
        assert_eq!(reviews[0].text, "Fine car");
    }

    #[test]
    fn blank_review_rows_are_kept_for_failure_reporting() {
        let file = csv_file("review\n\" \"\nGreat experience overall\n");
        let reviews = load_reviews_csv(file.path()).unwrap();

        assert_eq!(reviews.len(), 2);
        assert!(reviews[0].text.trim().is_empty());
    }

    #[test]
    fn demo_dataset_has_five_reviews_with_ids() {
        let reviews = demo_reviews();
        assert_eq!(reviews.len(), 5);
        assert!(reviews.iter().all(|r| r.id.is_some() && !r.text.is_empty()));
    }
}
