use crate::model::Participant;
use crate::reveal::Reveal;

/// Permet de customiser le rendu du message de révélation (texte, mail, etc.).
pub trait MessageRenderer {
    fn render(&self, giver: &Participant, recipient: &Participant) -> String;
}

/// Message texte simple, avec le budget minimum s'il est fixé.
#[derive(Debug, Default, Clone)]
pub struct TextMessage {
    pub budget: Option<String>,
}

impl TextMessage {
    pub fn with_budget<S: Into<String>>(budget: S) -> Self {
        Self {
            budget: Some(budget.into()),
        }
    }
}

impl MessageRenderer for TextMessage {
    fn render(&self, giver: &Participant, recipient: &Participant) -> String {
        let mut out = format!(
            "Bonjour {giver},\n\nTon Secret Santa : tu offres un cadeau à {recipient} !\n",
            giver = giver.name,
            recipient = recipient.name,
        );
        if let Some(budget) = &self.budget {
            out.push_str(&format!("Budget minimum : {budget}\n"));
        }
        out.push_str("\nGarde le secret jusqu'au jour J.");
        out
    }
}

/// Rend le message d'une révélation.
pub fn render_reveal(reveal: &Reveal, renderer: &dyn MessageRenderer) -> String {
    renderer.render(&reveal.giver, &reveal.recipient)
}
