/// Comment endpoints for a sighting.
use serde_json::json;

use super::client::{decode, expect_success, ApiClient};
use super::error::ApiResult;
use super::models::{Comment, CommentEnvelope, CommentsList};

/// Fetch the full comment list; the server ignores pagination parameters,
/// so paging happens client-side.
pub async fn list(api: &ApiClient, sighting_id: i64) -> ApiResult<Vec<Comment>> {
    let response = api
        .get(&format!("/sightings/{sighting_id}/comments"), None)
        .send()
        .await?;
    let list: CommentsList = decode(response).await?;
    Ok(list.comments)
}

/// Create a comment. Content is sentence-capitalized before submission,
/// matching what the rest of the service displays.
pub async fn create(
    api: &ApiClient,
    token: &str,
    sighting_id: i64,
    user_id: i64,
    content: &str,
) -> ApiResult<Comment> {
    let response = api
        .post(&format!("/sightings/{sighting_id}/comments"), Some(token))
        .json(&json!({
            "user_id": user_id,
            "sighting_id": sighting_id,
            "content": capitalize_sentences(content),
        }))
        .send()
        .await?;
    let envelope: CommentEnvelope = decode(response).await?;
    Ok(envelope.comment)
}

pub async fn delete(
    api: &ApiClient,
    token: &str,
    sighting_id: i64,
    comment_id: i64,
) -> ApiResult<()> {
    let response = api
        .delete(
            &format!("/sightings/{sighting_id}/comments/{comment_id}"),
            Some(token),
        )
        .send()
        .await?;
    expect_success(response).await
}

/// Uppercase the first letter of each sentence and lowercase the rest.
fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_sentence_start = true;

    for ch in text.trim().chars() {
        if at_sentence_start && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            at_sentence_start = false;
        } else {
            out.extend(ch.to_lowercase());
            if matches!(ch, '.' | '!' | '?') {
                at_sentence_start = true;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_sentence() {
        assert_eq!(
            capitalize_sentences("lovely flower. saw it TWICE! really"),
            "Lovely flower. Saw it twice! Really"
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(capitalize_sentences("  hello there  "), "Hello there");
    }

    #[test]
    fn leaves_empty_input_empty() {
        assert_eq!(capitalize_sentences(""), "");
    }
}
