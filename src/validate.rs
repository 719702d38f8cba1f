use crate::error::ValidationError;
use crate::model::{BookmarkPatch, BookmarkPayload, DEFAULT_RATING, MAX_RATING, MIN_RATING, NewBookmark};

fn rating_in_range(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Blank strings count as absent so the non-empty column invariant holds.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    present(value).ok_or(ValidationError::MissingField(field))
}

/// Checks a create body. Required fields are checked in the order
/// `title`, `url`, `description`; the rating check only runs once they are all there.
pub fn validate_new(payload: BookmarkPayload) -> Result<NewBookmark, ValidationError> {
    let title = required(payload.title, "title")?;
    let url = required(payload.url, "url")?;
    let description = required(payload.description, "description")?;

    let rating = payload.rating.unwrap_or(DEFAULT_RATING);
    if !rating_in_range(rating) {
        return Err(ValidationError::InvalidData);
    }

    Ok(NewBookmark {
        title,
        url,
        description,
        rating,
    })
}

pub fn validate_patch(payload: BookmarkPayload) -> Result<BookmarkPatch, ValidationError> {
    let supplied = BookmarkPatch {
        title: payload.title,
        url: payload.url,
        description: payload.description,
        rating: payload.rating,
    };
    if supplied.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    let text_fields = [&supplied.title, &supplied.url, &supplied.description];
    if text_fields
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| v.trim().is_empty()))
    {
        return Err(ValidationError::InvalidData);
    }
    if supplied.rating.is_some_and(|r| !rating_in_range(r)) {
        return Err(ValidationError::InvalidData);
    }

    Ok(supplied)
}
