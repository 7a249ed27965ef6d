use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for replaying a batch of submissions. Hidden when there is
/// nothing to show so it never flashes an empty bar.
pub fn progress_bar(len: u64, msg: String) -> ProgressBar {
    if len == 0 {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message(msg);

    bar
}
