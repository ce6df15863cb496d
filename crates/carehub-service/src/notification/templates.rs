//! Human-readable notification messages.

/// Longest post title quoted in a message.
pub const TITLE_EXCERPT_CHARS: usize = 50;
/// Longest comment or reply quoted in a message.
pub const CONTENT_EXCERPT_CHARS: usize = 100;

/// Cut `text` to at most `max` characters, appending `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn post_liked(sender: &str, post_title: &str) -> String {
    format!(
        "{sender} liked your post \"{}\"",
        truncate(post_title, TITLE_EXCERPT_CHARS)
    )
}

pub fn post_comment(sender: &str, comment: &str) -> String {
    format!(
        "{sender} commented on your post: \"{}\"",
        truncate(comment, CONTENT_EXCERPT_CHARS)
    )
}

pub fn comment_reply(sender: &str, reply: &str) -> String {
    format!(
        "{sender} replied to your comment: \"{}\"",
        truncate(reply, CONTENT_EXCERPT_CHARS)
    )
}

pub fn community_invite(sender: &str, community: &str) -> String {
    format!(
        "{sender} invited you to join {}",
        truncate(community, TITLE_EXCERPT_CHARS)
    )
}

pub fn join_request_response(community: &str, accepted: bool) -> String {
    let verdict = if accepted { "accepted" } else { "declined" };
    format!(
        "Your request to join {} was {verdict}",
        truncate(community, TITLE_EXCERPT_CHARS)
    )
}

pub fn new_member(sender: &str, community: &str) -> String {
    format!(
        "{sender} joined {}",
        truncate(community, TITLE_EXCERPT_CHARS)
    )
}

pub fn mention(sender: &str, excerpt: &str, in_comment: bool) -> String {
    let place = if in_comment { "a comment" } else { "a post" };
    format!(
        "{sender} mentioned you in {place}: \"{}\"",
        truncate(excerpt, CONTENT_EXCERPT_CHARS)
    )
}

pub fn friend_request(sender: &str) -> String {
    format!("{sender} sent you a friend request")
}
