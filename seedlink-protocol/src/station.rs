use serde::Serialize;

/// One entry of a server's station catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StationRecord {
    /// FDSN network code (e.g., `"IU"`).
    pub network: String,
    /// Station code (e.g., `"ANMO"`).
    pub station: String,
    /// Free-text site description.
    pub site: String,
}

impl StationRecord {
    /// Decode one catalog line by column position.
    ///
    /// Columns 0..2 hold the network, 3..8 the station and 9.. the site.
    /// Each field is trimmed. Short lines are not rejected: a slice past the
    /// end of the line becomes an empty string.
    pub fn parse_line(line: &str) -> Self {
        Self {
            network: column(line, 0, Some(2)),
            station: column(line, 3, Some(8)),
            site: column(line, 9, None),
        }
    }

    /// Encode back to the fixed-column layout read by [`parse_line`](Self::parse_line).
    pub fn to_line(&self) -> String {
        format!("{:<2} {:<5} {}", self.network, self.station, self.site)
    }
}

fn column(line: &str, start: usize, end: Option<usize>) -> String {
    let chars = line.chars().skip(start);
    let field: String = match end {
        Some(end) => chars.take(end.saturating_sub(start)).collect(),
        None => chars.collect(),
    };
    field.trim().to_owned()
}
