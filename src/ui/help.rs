use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation:",
        items: &[
            ("h/l ←/→", "Previous / next column"),
            ("j/k ↓/↑", "Next / previous row"),
            ("g/G    ", "First / last row"),
        ],
    },
    HelpSection {
        title: "Columns:",
        items: &[
            ("c      ", "Add column"),
            ("R      ", "Rename column"),
            ("D      ", "Delete column"),
            ("Y      ", "Duplicate column"),
            ("H/L    ", "Move column left / right"),
            ("</>    ", "Narrower / wider"),
            ("v/V    ", "Split into parts / unsplit"),
        ],
    },
    HelpSection {
        title: "Sections and boxes:",
        items: &[
            ("s      ", "Add section"),
            ("b      ", "Add box"),
            ("e/⏎    ", "Edit title or text"),
            ("d      ", "Delete"),
            ("y      ", "Duplicate"),
            ("J/K    ", "Move down / up"),
            ("t      ", "Next category"),
            ("w      ", "Full / half width"),
            ("␣      ", "Mark box for a group move"),
        ],
    },
    HelpSection {
        title: "Formatting:",
        items: &[
            ("-      ", "Insert divider, or next line style"),
            ("I      ", "Insert image"),
            ("a      ", "Align left / center / right"),
            ("T      ", "Box text color"),
            ("C      ", "Column header color"),
            ("+      ", "New category"),
            ("E/X    ", "Edit / delete the box's category"),
        ],
    },
    HelpSection {
        title: "Drag and drop:",
        items: &[
            ("m/M    ", "Pick up row / column"),
            ("⏎      ", "Drop"),
            ("y      ", "Drop a copy"),
            ("a      ", "Drop without splitting the target"),
            ("Esc    ", "Cancel"),
        ],
    },
    HelpSection {
        title: "Files and slides:",
        items: &[
            ("x/i    ", "Export / import file"),
            ("B      ", "Batch import into section"),
            ("O      ", "Copy outline"),
            ("S/P    ", "Save / load project"),
            ("N      ", "Notes"),
            ("n      ", "Capture slide"),
            ("p      ", "Present slides"),
            ("^s     ", "Save now"),
            ("q      ", "Quit"),
        ],
    },
    HelpSection {
        title: "Canvas:",
        items: &[
            ("z      ", "Canvas mode"),
            ("Z      ", "Next size preset"),
            ("#      ", "Grid"),
            ("o      ", "Connector mode, ⏎ picks columns"),
        ],
    },
];

pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_text = Self::build_help_text();
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_help_text() -> Vec<Line<'static>> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from(Span::styled("Explainator Help", bold)), Line::from("")];

        for section in SECTIONS {
            lines.push(Line::from(Span::styled(section.title, bold)));
            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }
            lines.push(Line::from(""));
        }

        lines
    }
}
