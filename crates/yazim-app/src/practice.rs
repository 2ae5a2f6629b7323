//! Interactive practice loop.
//!
//! Lines typed at the prompt are appended to the buffer. Lines starting with
//! `/` are commands. Dictation is fed by `/say`, which plays the role of the
//! speech recognizer.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use yazim_core::error::YazimError;
use yazim_core::types::SessionStatus;
use yazim_dictation::ChannelRecognizer;
use yazim_session::InputOutcome;
use yazim_workbench::{Workbench, WorkbenchSnapshot};

use crate::render;

pub const HELP: &str = "\
Yazmaya başlayın; her satır metne eklenir.
Komutlar:
  /finish            bitir ve analiz et
  /pause, /resume    duraklat / devam et
  /back              sonuç ekranından metne dön
  /reset             her şeyi temizle
  /undo, /redo       geri al / yinele
  /set <metin>       metni tamamen değiştir
  /clear             metni sil
  /translate         Türkçe <-> İngilizce çevir
  /enhance           metni prompt olarak geliştir
  /dictate           dikteyi başlat / durdur
  /say <metin>       konuşma tanıyıcıya söylenen metin
  /end               tanıyıcının kendiliğinden durması
  /auto [on|off]     dikte sonrası oto-düzeltme
  /persistent [on|off]  kalıcı dikte
  /show              durumu göster
  /help              bu yardım
  /quit              çık";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeCommand {
    Help,
    Show,
    Set(String),
    Clear,
    Pause,
    Resume,
    Finish,
    Back,
    Reset,
    Undo,
    Redo,
    Translate,
    Enhance,
    Dictate,
    Say(String),
    End,
    /// `None` toggles.
    AutoCorrect(Option<bool>),
    Persistent(Option<bool>),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeInput {
    Text(String),
    Command(PracticeCommand),
    Unknown(String),
}

pub fn parse_line(line: &str) -> PracticeInput {
    let Some(rest) = line.trim_end().strip_prefix('/') else {
        return PracticeInput::Text(line.trim_end().to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "h" | "?" => PracticeCommand::Help,
        "show" => PracticeCommand::Show,
        "set" => PracticeCommand::Set(arg.to_string()),
        "clear" => PracticeCommand::Clear,
        "pause" => PracticeCommand::Pause,
        "resume" => PracticeCommand::Resume,
        "finish" | "done" => PracticeCommand::Finish,
        "back" => PracticeCommand::Back,
        "reset" => PracticeCommand::Reset,
        "undo" => PracticeCommand::Undo,
        "redo" => PracticeCommand::Redo,
        "translate" => PracticeCommand::Translate,
        "enhance" => PracticeCommand::Enhance,
        "dictate" | "mic" => PracticeCommand::Dictate,
        "say" => PracticeCommand::Say(arg.to_string()),
        "end" => PracticeCommand::End,
        "auto" => match parse_switch(arg) {
            Ok(value) => PracticeCommand::AutoCorrect(value),
            Err(()) => return PracticeInput::Unknown(line.to_string()),
        },
        "persistent" => match parse_switch(arg) {
            Ok(value) => PracticeCommand::Persistent(value),
            Err(()) => return PracticeInput::Unknown(line.to_string()),
        },
        "quit" | "exit" | "q" => PracticeCommand::Quit,
        _ => return PracticeInput::Unknown(line.to_string()),
    };
    PracticeInput::Command(command)
}

fn parse_switch(arg: &str) -> Result<Option<bool>, ()> {
    match arg.to_lowercase().as_str() {
        "" => Ok(None),
        "on" | "açık" | "true" => Ok(Some(true)),
        "off" | "kapalı" | "false" => Ok(Some(false)),
        _ => Err(()),
    }
}

/// Buffer after appending one typed line.
pub fn append_line(buffer: &str, line: &str) -> String {
    if buffer.is_empty() {
        line.to_string()
    } else {
        format!("{}\n{}", buffer, line)
    }
}

/// What changed between two snapshots, as lines to print.
pub fn describe_changes(before: &WorkbenchSnapshot, after: &WorkbenchSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    if after.status != before.status {
        lines.push(format!("Durum: {} -> {}", before.status, after.status));
    }
    if after.status == SessionStatus::Finished && after.stats != before.stats {
        if let Some(stats) = after.stats.as_ref() {
            lines.push(render::stats_line(stats, None));
            lines.push("Analiz ediliyor...".to_string());
        }
    }
    if after.feedback != before.feedback {
        if let (Some(feedback), Some(submitted)) =
            (after.feedback.as_ref(), after.submitted_text.as_deref())
        {
            lines.push(render::feedback_report(
                submitted,
                feedback,
                after.stats.as_ref(),
            ));
        }
    }
    if after.buffer != before.buffer && after.status != SessionStatus::Finished {
        lines.push(format!("Metin: {}", after.buffer));
    }
    if after.error != before.error {
        if let Some(error) = after.error.as_deref() {
            lines.push(format!("Hata: {}", error));
        }
    }
    if after.dictation != before.dictation {
        lines.push(format!("Dikte: {:?}", after.dictation));
    }
    lines
}

pub struct Practice {
    workbench: Workbench,
    recognizer: Arc<ChannelRecognizer>,
}

impl Practice {
    pub fn new(workbench: Workbench, recognizer: Arc<ChannelRecognizer>) -> Self {
        Self {
            workbench,
            recognizer,
        }
    }

    /// Read commands from stdin until `/quit` or end of input.
    pub async fn run(mut self) -> Result<(), YazimError> {
        let mut events = self.workbench.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => tracing::debug!(event = event.event_name(), "Domain event"),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event log fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        println!("{}", HELP);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !self.on_line(&line) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Some(message) = self.workbench.next_message() => {
                    let before = self.workbench.snapshot();
                    self.workbench.handle(message);
                    print_changes(&before, &self.workbench.snapshot());
                }
            }
        }

        tracing::info!("Practice session closed");
        Ok(())
    }

    /// Apply one input line. Returns false when the user quits.
    pub fn on_line(&mut self, line: &str) -> bool {
        let before = self.workbench.snapshot();
        match parse_line(line) {
            PracticeInput::Text(text) => {
                if text.is_empty() {
                    return true;
                }
                let buffer = append_line(&before.buffer, &text);
                if self.workbench.type_text(&buffer) == InputOutcome::Ignored {
                    println!("Metin şu anda değiştirilemez ({}).", before.status);
                }
            }
            PracticeInput::Command(PracticeCommand::Quit) => return false,
            PracticeInput::Command(command) => self.on_command(command),
            PracticeInput::Unknown(line) => {
                println!("Bilinmeyen komut: {} (/help)", line);
            }
        }
        print_changes(&before, &self.workbench.snapshot());
        true
    }

    fn on_command(&mut self, command: PracticeCommand) {
        let result = match command {
            PracticeCommand::Help => {
                println!("{}", HELP);
                Ok(())
            }
            PracticeCommand::Show => {
                let snapshot = self.workbench.snapshot();
                println!("{}", render::status_line(&snapshot));
                println!("Metin: {}", snapshot.buffer);
                Ok(())
            }
            PracticeCommand::Set(text) => {
                report_ignored(self.workbench.type_text(&text));
                Ok(())
            }
            PracticeCommand::Clear => {
                report_ignored(self.workbench.type_text(""));
                Ok(())
            }
            PracticeCommand::Pause => self.workbench.pause(),
            PracticeCommand::Resume => self.workbench.resume(),
            PracticeCommand::Finish => match self.workbench.finish() {
                Ok(None) => {
                    println!("Analiz edilecek metin yok.");
                    Ok(())
                }
                Ok(Some(_)) => Ok(()),
                Err(e) => Err(e),
            },
            PracticeCommand::Back => self.workbench.go_back(),
            PracticeCommand::Reset => {
                self.workbench.reset();
                println!("Oturum sıfırlandı.");
                Ok(())
            }
            PracticeCommand::Undo => {
                if !self.workbench.undo() {
                    println!("Geri alınacak adım yok.");
                }
                Ok(())
            }
            PracticeCommand::Redo => {
                if !self.workbench.redo() {
                    println!("Yinelenecek adım yok.");
                }
                Ok(())
            }
            PracticeCommand::Translate => self.workbench.translate().map(|started| {
                if started {
                    println!("Çevriliyor...");
                }
            }),
            PracticeCommand::Enhance => self.workbench.enhance_prompt().map(|started| {
                if started {
                    println!("Prompt geliştiriliyor...");
                }
            }),
            PracticeCommand::Dictate => self.workbench.toggle_dictation().map(|listening| {
                if listening {
                    println!("Dinleniyor. /say ile konuşun, /dictate ile durdurun.");
                }
            }),
            PracticeCommand::Say(text) => {
                if !self.recognizer.say(&text) {
                    println!("Dikte açık değil (/dictate).");
                }
                Ok(())
            }
            PracticeCommand::End => {
                if !self.recognizer.end() {
                    println!("Dikte açık değil.");
                }
                Ok(())
            }
            PracticeCommand::AutoCorrect(value) => {
                let enabled = value.unwrap_or(!self.workbench.auto_correct());
                self.workbench.set_auto_correct(enabled);
                println!("Oto-düzeltme: {}", if enabled { "açık" } else { "kapalı" });
                Ok(())
            }
            PracticeCommand::Persistent(value) => {
                let enabled = value.unwrap_or(!self.workbench.persistent_dictation());
                self.workbench.set_persistent_dictation(enabled);
                println!("Kalıcı dikte: {}", if enabled { "açık" } else { "kapalı" });
                Ok(())
            }
            PracticeCommand::Quit => Ok(()),
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "Command rejected");
            println!("{}", e.user_message());
        }
    }
}

fn report_ignored(outcome: InputOutcome) {
    if outcome == InputOutcome::Ignored {
        println!("Metin şu anda değiştirilemez.");
    }
}

fn print_changes(before: &WorkbenchSnapshot, after: &WorkbenchSnapshot) {
    for line in describe_changes(before, after) {
        println!("{}", line);
    }
}
