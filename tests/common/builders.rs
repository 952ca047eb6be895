use localplay::media::IndexRow;

pub struct IndexRowBuilder {
    row: IndexRow,
}

impl IndexRowBuilder {
    pub fn new(id: i64, path: &str) -> Self {
        Self {
            row: IndexRow {
                id,
                path: path.to_string(),
                duration_ms: 60_000,
                width: 1920,
                height: 1080,
                size: 1024,
            },
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.row.duration_ms = duration_ms;
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.row.size = size;
        self
    }

    pub fn build(self) -> IndexRow {
        self.row
    }
}
