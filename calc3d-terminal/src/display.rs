/// Calculator display panel drawn onto the model's display part
use calc3d_core::DisplaySurface;

/// Fixed-width display: text is right-aligned, and when it is too long
/// only the rightmost characters are shown.
#[derive(Debug, Clone)]
pub struct DisplayPanel {
    text: String,
    width: usize,
}

impl DisplayPanel {
    pub fn new(width: usize) -> Self {
        Self {
            text: String::new(),
            width: width.max(1),
        }
    }

    /// Last text received, untrimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fitted(&self) -> String {
        let len = self.text.chars().count();
        if len > self.width {
            self.text.chars().skip(len - self.width).collect()
        } else {
            format!("{:>width$}", self.text, width = self.width)
        }
    }
}

impl DisplaySurface for DisplayPanel {
    fn show(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}
