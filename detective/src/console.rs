//! Menu-driven console for the detective game.
//!
//! The loop reads one line per prompt, so it runs the same against a
//! terminal, a pipe or an in-memory buffer. Lines are taken as raw bytes;
//! anything that is not UTF-8 is replaced rather than rejected.

use detective_core::{
    report, CaseSummary, Choice, Investigation, InvestigationError, StepOutcome,
};
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Investigation(#[from] InvestigationError),
}

const MENU: &str = "\n=== Detective Quest - Menu ===
1) Explorar a mansão
2) Ver o mapa da mansão
3) Revisar pistas coletadas
4) Listar suspeitos e suas pistas
5) Adicionar pista manualmente e associar a um suspeito
6) Ver o suspeito mais provável
0) Sair
> ";

const INVALID_MOVE: &str = "Movimento inválido ou caminho inexistente.";

/// Whether the player can still type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Open,
    Closed,
}

pub struct Console<R, W> {
    input: R,
    out: W,
    investigation: Investigation,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(investigation: Investigation, input: R, out: W) -> Self {
        Self {
            input,
            out,
            investigation,
        }
    }

    /// Run the menu until the player quits or input ends.
    ///
    /// Prints the final report and returns the closing summary.
    pub fn run(mut self) -> Result<CaseSummary, ConsoleError> {
        writeln!(self.out, "Bem-vindo a {}!", self.investigation.title())?;
        writeln!(self.out, "Explore a mansão, colete pistas e associe-as aos suspeitos.")?;

        loop {
            write!(self.out, "{MENU}")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match line.trim() {
                "1" => {
                    if self.explore()? == Input::Closed {
                        break;
                    }
                }
                "2" => {
                    writeln!(self.out, "\nMapa da mansão:")?;
                    let mansion = self.investigation.mansion();
                    write!(self.out, "{}", report::render_map(&mansion.graph, mansion.root))?;
                }
                "3" => {
                    writeln!(self.out, "\nPistas (ordem alfabética):")?;
                    write!(self.out, "{}", report::render_clues(self.investigation.clues()))?;
                }
                "4" => self.list_suspects()?,
                "5" => {
                    if self.manual_clue()? == Input::Closed {
                        break;
                    }
                }
                "6" => {
                    let leading = report::render_leading(self.investigation.leading_suspect());
                    writeln!(self.out, "\n{leading}")?;
                }
                "0" => break,
                other => {
                    warn!(option = other, "unknown menu option");
                    writeln!(self.out, "Opção inválida.")?;
                }
            }
        }

        self.finish()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            warn!("input line was not valid UTF-8");
        }
        Ok(Some(line.into_owned()))
    }

    fn explore(&mut self) -> Result<Input, ConsoleError> {
        let outcome = self.investigation.begin_exploration()?;
        self.show_outcome(&outcome)?;

        loop {
            write!(self.out, "Escolha: (e) esquerda, (d) direita, (s) parar de explorar\n> ")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(Input::Closed);
            };
            let Some(choice) = Choice::from_input(&line) else {
                writeln!(self.out, "{INVALID_MOVE}")?;
                continue;
            };
            match self.investigation.step(choice) {
                Ok(StepOutcome::Stopped) => return Ok(Input::Open),
                Ok(outcome) => self.show_outcome(&outcome)?,
                Err(InvestigationError::Map(e)) => {
                    warn!(error = %e, "move rejected");
                    writeln!(self.out, "{INVALID_MOVE}")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn show_outcome(&mut self, outcome: &StepOutcome) -> io::Result<()> {
        if let StepOutcome::Entered { room, clue } = outcome {
            writeln!(self.out, "\nVocê está em: {room}")?;
            if let Some(clue) = clue {
                writeln!(self.out, "Pista encontrada: {clue}")?;
            }
        }
        Ok(())
    }

    fn list_suspects(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n--- Suspeitos e suas pistas ---")?;
        write!(self.out, "{}", report::render_suspects(self.investigation.suspects()))
    }

    fn manual_clue(&mut self) -> Result<Input, ConsoleError> {
        write!(self.out, "Texto da pista: ")?;
        self.out.flush()?;
        let Some(clue) = self.read_line()? else {
            return Ok(Input::Closed);
        };
        write!(self.out, "Suspeito a associar: ")?;
        self.out.flush()?;
        let Some(suspect) = self.read_line()? else {
            return Ok(Input::Closed);
        };

        match self.investigation.record_manual(&clue, &suspect) {
            Ok(()) => writeln!(self.out, "Pista adicionada e associada.")?,
            Err(InvestigationError::EmptyClue) => writeln!(self.out, "Pista vazia não adicionada.")?,
            Err(e) => return Err(e.into()),
        }
        Ok(Input::Open)
    }

    fn finish(mut self) -> Result<CaseSummary, ConsoleError> {
        writeln!(self.out, "\nRelatório final:")?;
        writeln!(self.out, "Pistas coletadas (ordem alfabética):")?;
        write!(self.out, "{}", report::render_clues(self.investigation.clues()))?;
        self.list_suspects()?;

        let summary = self.investigation.close();
        write!(self.out, "\n{}", report::render_summary(&summary))?;
        writeln!(self.out, "Obrigado por jogar!")?;
        self.out.flush()?;
        Ok(summary)
    }
}
