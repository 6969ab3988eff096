//! HTML rendering for the single page

use std::fmt::Write;

use crate::media::VideoDescriptor;

/// Everything the page template needs
#[derive(Debug, Default, Clone)]
pub struct PageView {
    /// URL the user last submitted, echoed back into the input field
    pub playlist_url: String,
    pub videos: Vec<VideoDescriptor>,
    pub message: String,
    /// Archive file name under `/downloads/`
    pub download_link: Option<String>,
}

impl PageView {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:1em}\
.card{border:1px solid #ddd;border-radius:6px;padding:.5em}\
.card img{width:100%;border-radius:4px}\
.message{padding:.75em;background:#f4f4f4;border-radius:4px}\
input[type=text]{width:70%}";

/// Render the index page
pub fn render_index(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Playlist to MP3</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<h1>Playlist to MP3</h1>\n");

    html.push_str("<form method=\"post\" action=\"/\">\n");
    let _ = writeln!(
        html,
        "<input type=\"text\" name=\"playlist_url\" placeholder=\"Video or playlist URL\" value=\"{}\" required>",
        escape_html(&view.playlist_url)
    );
    html.push_str("<button type=\"submit\">Fetch videos</button>\n</form>\n");

    if !view.message.is_empty() {
        let _ = writeln!(html, "<p class=\"message\">{}</p>", escape_html(&view.message));
    }

    if let Some(link) = &view.download_link {
        let _ = writeln!(
            html,
            "<p><a class=\"button\" href=\"/downloads/{}\" download>Download {}</a></p>",
            escape_html(&encode_path_segment(link)),
            escape_html(link)
        );
    }

    if !view.videos.is_empty() {
        render_video_grid(&mut html, &view.videos);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_video_grid(html: &mut String, videos: &[VideoDescriptor]) {
    html.push_str("<form method=\"post\" action=\"/\">\n");
    let _ = writeln!(html, "<p>{} video(s) found</p>", videos.len());
    html.push_str("<div class=\"grid\">\n");

    for video in videos {
        let _ = writeln!(
            html,
            "<label class=\"card\" data-id=\"{id}\">\
<img src=\"{thumb}\" alt=\"\" loading=\"lazy\">\
<input type=\"checkbox\" name=\"download_urls[]\" value=\"{url}\" checked> {title}\
</label>",
            id = escape_html(&video.id),
            thumb = escape_html(&video.thumbnail),
            url = escape_html(&video.url),
            title = escape_html(&video.title),
        );
    }

    html.push_str("</div>\n");
    html.push_str(
        "<button type=\"submit\" name=\"download\" value=\"1\">Download selected as MP3</button>\n",
    );
    html.push_str("</form>\n");
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
