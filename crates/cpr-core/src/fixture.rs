//! Synthetic project buffers for tests.

pub(crate) const EQ_GUID: &str = "297BA567D83144E1AE921DEF07B41156";
pub(crate) const SYLENTH_GUID: &str = "56535473796C3173796C656E74683100";

/// Assembles the byte layout Cubase writes around its markers
#[derive(Debug, Default)]
pub(crate) struct ProjectBuilder {
    data: Vec<u8>,
}

impl ProjectBuilder {
    /// Key written after a plugin name when the track was not renamed
    pub(crate) const TRAILING_KEY: &'static str = "Audio Input Count";
    /// Size of the trailing key token
    pub(crate) const TRAILING_KEY_LEN: usize = Self::TRAILING_KEY.len() + 2;

    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn metadata(
        mut self,
        application: &str,
        version: &str,
        release_date: &str,
        architecture: Option<&str>,
    ) -> Self {
        self.data.extend_from_slice(b"PAppVersion\0");
        self.gap(9).token(application).gap(3).token(version).gap(3);
        self.token(release_date).gap(7);
        if let Some(architecture) = architecture {
            self.token(architecture);
        }
        self
    }

    pub(crate) fn plugin(mut self, guid: &str, name: &str) -> Self {
        self.plugin_head(guid).token(name).gap(3).token(Self::TRAILING_KEY);
        self
    }

    /// A plugin whose name is written exactly as `name`, whatever its encoding
    pub(crate) fn plugin_with_raw_name(mut self, guid: &str, name: &[u8]) -> Self {
        self.plugin_head(guid).raw_token(name).gap(3).token(Self::TRAILING_KEY);
        self
    }

    pub(crate) fn renamed_plugin(mut self, guid: &str, title: &str, name: &str) -> Self {
        self.plugin_head(guid).token(title).gap(3);
        self.token("Original Plugin Name").gap(5).token(name);
        self
    }

    pub(crate) fn plugin_with_unterminated_name(mut self, guid: &str, name: &str) -> Self {
        self.plugin_head(guid);
        self.data.push(name.len() as u8);
        self.data.extend_from_slice(name.as_bytes());
        self.gap(3).token(Self::TRAILING_KEY);
        self
    }

    /// Drop the terminator of the first token whose text is `text`
    pub(crate) fn unterminate(mut self, text: &str) -> Self {
        let mut token = vec![text.len() as u8 + 1];
        token.extend_from_slice(text.as_bytes());
        token.push(0);
        let position = self
            .data
            .windows(token.len())
            .position(|window| window == token.as_slice())
            .expect("token not present in fixture");
        self.data[position] -= 1;
        self.data.remove(position + token.len() - 1);
        self
    }

    pub(crate) fn noise(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        self.data
    }

    /// Cut the buffer two bytes into the first occurrence of `needle`
    pub(crate) fn truncate_inside(self, needle: &[u8]) -> Vec<u8> {
        let mut data = self.data;
        let position = data
            .windows(needle.len())
            .position(|window| window == needle)
            .expect("needle not present in fixture");
        data.truncate(position + 2);
        data
    }

    pub(crate) fn truncate_end(self, count: usize) -> Vec<u8> {
        let mut data = self.data;
        data.truncate(data.len() - count);
        data
    }

    fn plugin_head(&mut self, guid: &str) -> &mut Self {
        self.data.extend_from_slice(b"Plugin UID\0");
        self.gap(22).token(guid).gap(3).token("Plugin Name").gap(5)
    }

    fn gap(&mut self, count: usize) -> &mut Self {
        self.data.resize(self.data.len() + count, 0);
        self
    }

    fn token(&mut self, text: &str) -> &mut Self {
        self.raw_token(text.as_bytes())
    }

    fn raw_token(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.push(bytes.len() as u8 + 1);
        self.data.extend_from_slice(bytes);
        self.data.push(0);
        self
    }
}
