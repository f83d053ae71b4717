//! Upload form served at the root
//!
//! A minimal HTML page that exercises the analysis endpoint. The page is a
//! plain consumer of the API, not part of it.

use axum::response::Html;

const UPLOAD_FORM: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>File Metadata Microservice</title>
  </head>
  <body>
    <h2>File Metadata Microservice</h2>
    <form method="POST" action="/api/fileanalyse" enctype="multipart/form-data">
      <input type="file" name="upfile" />
      <button type="submit">Upload</button>
    </form>
  </body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}
