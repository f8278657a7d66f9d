use axum::response::Html;

/// GET / - static liveness greeting.
pub async fn home() -> Html<&'static str> {
    Html("<h1>Gemgate is running</h1><p>POST your prompt to <code>/api/gemini</code>.</p>")
}
