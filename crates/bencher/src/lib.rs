/// A request body together with the content type it is posted with.
#[derive(Debug, Copy, Clone)]
pub struct BodyFixture {
    file_name: &'static str,
    content_type: &'static str,
    content: &'static [u8],
}

impl BodyFixture {
    pub const fn new(file_name: &'static str, content_type: &'static str, content: &'static [u8]) -> Self {
        Self { file_name, content_type, content }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn content(&self) -> &'static [u8] {
        self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct BenchCase {
    name: &'static str,
    size: BodySize,
    fixture: BodyFixture,
}

impl BenchCase {
    pub fn new(name: &'static str, size: BodySize, fixture: BodyFixture) -> Self {
        Self { name, size, fixture }
    }

    pub fn small(name: &'static str, fixture: BodyFixture) -> Self {
        Self::new(name, BodySize::Small, fixture)
    }

    pub fn large(name: &'static str, fixture: BodyFixture) -> Self {
        Self::new(name, BodySize::Large, fixture)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> BodySize {
        self.size
    }

    pub fn fixture(&self) -> &BodyFixture {
        &self.fixture
    }
}

#[derive(Clone, Copy, Debug)]
pub enum BodySize {
    Small,
    Large,
}
