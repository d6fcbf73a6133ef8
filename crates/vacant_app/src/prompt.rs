//! Question-and-answer flow for `vacant interactive`.
use std::io::{self, BufRead, Write};

use vacant_core::{Platform, SalaryRange};

pub const DEFAULT_COUNT: usize = 100;

const PLATFORM_MENU: &str = "Select platforms to search for vacancies: \n\
                             1. HH.ru \n\
                             2. SuperJob.ru \n\
                             3. Next \n\
                             >>> ";

/// Everything the user chose before the search runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
    pub read_from_store: bool,
    pub platforms: Vec<Platform>,
    pub keyword: String,
    pub salary: SalaryRange,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Run(Choices),
    Quit,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `question` and reads one trimmed line.
    ///
    /// End of input is `UnexpectedEof` so loops cannot spin forever.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// `y`/`Y` is yes, anything else is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.ask(question)?.eq_ignore_ascii_case("y"))
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Walks the user through source, platforms, keyword, salary and count.
    pub fn collect(&mut self, store_exists: bool) -> io::Result<Session> {
        self.say("Welcome to Vacant app!")?;

        let read_from_store =
            store_exists && self.confirm("Do you want to read from file? (y/N): ")?;

        let platforms = loop {
            let selected = self.select_platforms()?;
            if !selected.is_empty() {
                break selected;
            }
            self.say("No platforms selected.")?;
            if self.confirm("Do you want to quit? (y/N): ")? {
                self.say("Exiting...")?;
                return Ok(Session::Quit);
            }
        };

        let keyword = self.ask("Enter keyword to search: ")?;

        let mut salary = SalaryRange::unbounded();
        if self.confirm("Salary range to be filtered? (y/N): ")? {
            salary.min = self.ask("Enter min salary (press enter to skip): ")?.parse().ok();
            salary.max = self.ask("Enter max salary (press enter to skip): ")?.parse().ok();
        }

        let count = self
            .ask("How many vacancies will be shown? (default: 100): ")?
            .parse()
            .unwrap_or(DEFAULT_COUNT);

        Ok(Session::Run(Choices {
            read_from_store,
            platforms,
            keyword,
            salary,
            count,
        }))
    }

    fn select_platforms(&mut self) -> io::Result<Vec<Platform>> {
        let mut selected = Vec::new();
        loop {
            let answer = self.ask(PLATFORM_MENU)?;
            if answer == "3" {
                return Ok(selected);
            }
            let Some(platform) = Platform::ALL
                .into_iter()
                .find(|platform| platform.menu_key() == answer)
            else {
                continue;
            };
            if selected.contains(&platform) {
                self.say("This platform already selected.")?;
            } else {
                selected.push(platform);
            }
        }
    }
}
