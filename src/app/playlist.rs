use crate::content::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChapterKind {
    Question,
    Bullet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chapter {
    pub(crate) text: String,
    pub(crate) kind: ChapterKind,
    pub(crate) question_index: usize,
    pub(crate) bullet_index: Option<usize>,
    pub(crate) asset: String,
}

/// Chapters in playback order. Built once from content and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Playlist {
    chapters: Vec<Chapter>,
}

pub(crate) fn sequence_asset(position: usize) -> String {
    format!("{:02}.mp3", position + 1)
}

impl Playlist {
    pub(crate) fn build(content: &Content) -> Self {
        let mut chapters = Vec::new();
        for (question_index, item) in content.questions.iter().enumerate() {
            let derived = sequence_asset(chapters.len());
            let asset = match item.audio_file.as_deref().map(str::trim) {
                Some(assigned) if !assigned.is_empty() => {
                    if assigned != derived {
                        tracing::warn!(
                            question = question_index + 1,
                            assigned,
                            derived = %derived,
                            "pre-assigned audio file does not follow the chapter sequence"
                        );
                    }
                    assigned.to_string()
                }
                _ => derived,
            };
            chapters.push(Chapter {
                text: item.question.clone(),
                kind: ChapterKind::Question,
                question_index,
                bullet_index: None,
                asset,
            });

            for (bullet_index, bullet) in item.answer.iter().enumerate() {
                chapters.push(Chapter {
                    text: bullet.clone(),
                    kind: ChapterKind::Bullet,
                    question_index,
                    bullet_index: Some(bullet_index),
                    asset: sequence_asset(chapters.len()),
                });
            }
        }
        Self { chapters }
    }

    pub(crate) fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.chapters.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    // Walks the list counting question/bullet boundaries instead of trusting the
    // stored indices, so hand-built chapter lists resolve the same way.
    pub(crate) fn position(&self, index: usize) -> Option<(usize, Option<usize>)> {
        if index >= self.chapters.len() {
            return None;
        }
        let mut question = None::<usize>;
        let mut bullet = None::<usize>;
        for chapter in &self.chapters[..=index] {
            match chapter.kind {
                ChapterKind::Question => {
                    question = Some(question.map_or(0, |q| q + 1));
                    bullet = None;
                }
                ChapterKind::Bullet => {
                    bullet = Some(bullet.map_or(0, |b| b + 1));
                }
            }
        }
        question.map(|q| (q, bullet))
    }

    /// Chapter index of a question's own entry.
    pub(crate) fn question_start(&self, question_index: usize) -> Option<usize> {
        self.chapters.iter().position(|chapter| {
            chapter.kind == ChapterKind::Question && chapter.question_index == question_index
        })
    }
}

#[cfg(test)]
impl Playlist {
    pub(crate) fn assets(&self) -> Vec<&str> {
        self.chapters
            .iter()
            .map(|chapter| chapter.asset.as_str())
            .collect()
    }

    pub(crate) fn from_chapters(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }
}
