/// Counters from a single poster run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub feeds_fetched: u32,
    pub feeds_failed: u32,
    pub entries_considered: u32,
    pub skipped_seen: u32,
    pub skipped_topic: u32,
    pub skipped_blocked: u32,
    pub published: u32,
    pub publish_failed: u32,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Poster Run Complete ===")?;
        writeln!(f, "Feeds fetched:     {}", self.feeds_fetched)?;
        writeln!(f, "Feeds failed:      {}", self.feeds_failed)?;
        writeln!(f, "Entries considered:{}", self.entries_considered)?;
        writeln!(f, "Skipped: seen:     {}", self.skipped_seen)?;
        writeln!(f, "Skipped: topic:    {}", self.skipped_topic)?;
        writeln!(f, "Skipped: blocked:  {}", self.skipped_blocked)?;
        writeln!(f, "Published:         {}", self.published)?;
        writeln!(f, "Publish failed:    {}", self.publish_failed)?;
        Ok(())
    }
}
