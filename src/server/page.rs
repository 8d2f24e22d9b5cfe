use std::fmt::Write as _;

use crate::error::VolumeError;
use crate::playback::PlaybackStatus;
use crate::volume::Volume;

pub(crate) const ICON_PNG: &[u8] = include_bytes!("icon.png");

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <script src="https://cdn.tailwindcss.com"></script>
  <title>Noise Machine</title>
  <link rel="apple-touch-icon" href="/icon.png">
  <link rel="icon" type="image/png" href="/icon.png">
</head>
<body class="bg-gray-900 text-white text-center py-20">
  <div class="container mx-auto">
    <h1 class="text-4xl font-bold mb-10">Noise Machine</h1>
"#;

const CONTROLS: &str = r##"
    <a href="#" onclick="post('/start')" class="block w-3/4 mx-auto bg-green-500 p-4 rounded-lg my-4 text-xl font-bold hover:bg-green-700 transition">Start</a>
    <a href="#" onclick="post('/stop')" class="block w-3/4 mx-auto bg-red-500 p-4 rounded-lg my-4 text-xl font-bold hover:bg-red-700 transition">Stop</a>
    <script>
      function post(path) {
        fetch(path, { method: 'POST' })
          .then(() => location.reload())
          .catch(err => console.error('Fetch error:', err));
      }
    </script>
"##;

const TAIL: &str = "  </div>\n</body>\n</html>\n";

/// Status page: label, start/stop buttons, and a volume slider when the
/// mixer can be read.
pub(crate) fn render_index(status: PlaybackStatus, volume: &Result<Volume, VolumeError>) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str(HEAD);

    let color = if status.is_running() {
        "green-500"
    } else {
        "red-500"
    };
    if write!(
        page,
        r#"    <p class="block w-3/4 mx-auto text-xl mb-10">
      <button onclick="location.reload();" class="block mx-auto p-2 text-sm">&#x1F504; Refresh</button>
      <span id="status" class="inline-block bg-{} text-white px-3 py-1 rounded-full font-bold">{}</span>
    </p>
"#,
        color,
        status.label()
    )
    .is_err()
    {
        page.push_str(status.label());
    }

    page.push_str(CONTROLS);

    match volume {
        Ok(level) => {
            if write!(
                page,
            r#"    <div class="block w-3/4 mx-auto text-l">
      <label for="volume-range" class="block mb-2 text-sm font-medium text-white">Volume</label>
      <input id="volume-range" type="range" min="0" max="100" value="{}" class="w-full h-2 rounded-lg appearance-none cursor-pointer bg-gray-700">
      <script>
        document.getElementById('volume-range').addEventListener('input', () => {{
          const volume = document.getElementById('volume-range').value;
          fetch('/volume?volume=' + volume, {{ method: 'POST' }})
            .catch(err => console.error('Error updating volume:', err));
        }});
      </script>
    </div>
"#,
                level
            )
            .is_err()
            {
                page.push_str("    <p>Volume unavailable</p>\n");
            }
        }
        Err(err) => {
            if write!(
                page,
                "    <p>Error getting volume: {}</p>\n",
                escape_html(&err.to_string())
            )
            .is_err()
            {
                page.push_str("    <p>Error getting volume</p>\n");
            }
        }
    }

    page.push_str(TAIL);
    page
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_page_shows_label_and_slider() -> Result<(), String> {
        let page = render_index(
            PlaybackStatus::Running { pid: 42 },
            &Ok(Volume::from_percent(64)),
        );
        for needle in [
            ">running</span>",
            "bg-green-500 text-white",
            r#"value="64""#,
            "fetch('/volume?volume=' + volume",
        ] {
            if !page.contains(needle) {
                return Err(format!("Missing {:?}", needle));
            }
        }
        Ok(())
    }

    #[test]
    fn stopped_page_reports_volume_error() -> Result<(), String> {
        let page = render_index(PlaybackStatus::Stopped, &Err(VolumeError::Unparseable));
        if !page.contains(">not running</span>") {
            return Err("Missing stopped label".to_owned());
        }
        if !page.contains("Error getting volume: failed to parse volume") {
            return Err("Missing volume error".to_owned());
        }
        if page.contains("volume-range") {
            return Err("Slider should be hidden".to_owned());
        }
        Ok(())
    }

    #[test]
    fn page_has_start_and_stop_controls() -> Result<(), String> {
        let page = render_index(PlaybackStatus::Stopped, &Ok(Volume::from_percent(10)));
        for needle in [
            r##"<a href="#" onclick="post('/start')""##,
            r##"<a href="#" onclick="post('/stop')""##,
            "fetch(path, { method: 'POST' })",
            "</html>",
        ] {
            if !page.contains(needle) {
                return Err(format!("Missing {:?}", needle));
            }
        }
        Ok(())
    }

    #[test]
    fn icon_is_a_png() -> Result<(), String> {
        if !ICON_PNG.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Err("Icon is not a PNG".to_owned());
        }
        Ok(())
    }

    #[test]
    fn escape_html_escapes_markup() -> Result<(), String> {
        if escape_html("<a href=\"x\">&</a>") != "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;" {
            return Err("Unexpected escaping".to_owned());
        }
        Ok(())
    }
}
