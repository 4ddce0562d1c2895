/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use parley::{Role, parley_msg};
///
/// let message = parley_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
/// ```
#[macro_export]
macro_rules! parley_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::System, $content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::User, $content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::new($crate::Role::Assistant, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use parley::{Role, parley_messages};
///
/// let messages = parley_messages![
///     system => "You are concise.",
///     user => "What changed in this release?",
/// ];
///
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role, Role::System);
/// assert_eq!(messages[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! parley_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::parley_msg!($role => $content)),+]
    };
}

/// Builds a [`ChatRequest`](crate::ChatRequest), optionally pinned to a provider.
///
/// ```rust
/// use parley::parley_request;
///
/// let request = parley_request!("u1", "Hello");
/// assert_eq!(request.provider, None);
///
/// let request = parley_request!("u1", "Hello", gemini);
/// assert_eq!(request.provider.as_deref(), Some("gemini"));
/// ```
#[macro_export]
macro_rules! parley_request {
    ($user_id:expr, $text:expr $(,)?) => {
        $crate::ChatRequest::new($text, $user_id)
    };
    ($user_id:expr, $text:expr, openai $(,)?) => {
        $crate::ChatRequest::new($text, $user_id).with_provider("openai")
    };
    ($user_id:expr, $text:expr, gemini $(,)?) => {
        $crate::ChatRequest::new($text, $user_id).with_provider("gemini")
    };
    ($user_id:expr, $text:expr, $provider:expr $(,)?) => {
        $crate::ChatRequest::new($text, $user_id).with_provider($provider)
    };
}
