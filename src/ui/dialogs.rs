//! Modal dialogs

/// Modal message boxes a window can raise.
pub trait Dialogs {
    fn info(&mut self, title: &str, message: &str);

    fn error(&mut self, title: &str, message: &str);

    /// Yes/no question; `true` means yes.
    fn confirm(&mut self, title: &str, question: &str) -> bool;
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;

    use super::Dialogs;

    /// Records every dialog and answers confirmations from a queue (default: no).
    #[derive(Debug, Default)]
    pub struct ScriptedDialogs {
        pub infos: Vec<String>,
        pub errors: Vec<String>,
        pub questions: Vec<String>,
        answers: VecDeque<bool>,
    }

    impl ScriptedDialogs {
        pub fn answering(answers: &[bool]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                ..Default::default()
            }
        }

        pub fn last_error(&self) -> Option<&str> {
            self.errors.last().map(String::as_str)
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn info(&mut self, _title: &str, message: &str) {
            self.infos.push(message.to_string());
        }

        fn error(&mut self, _title: &str, message: &str) {
            self.errors.push(message.to_string());
        }

        fn confirm(&mut self, _title: &str, question: &str) -> bool {
            self.questions.push(question.to_string());
            self.answers.pop_front().unwrap_or(false)
        }
    }
}
