//! Guided reflection: four fixed questions, each answered with a templated
//! acknowledgement that quotes the answer back.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReflectionStep {
    pub question: &'static str,
    pub placeholder: &'static str,
    #[serde(skip)]
    template: &'static str,
}

impl ReflectionStep {
    pub fn insight(&self, answer: &str) -> String {
        self.template.replace("{answer}", answer)
    }
}

pub static REFLECTION_PATH: [ReflectionStep; 4] = [
    ReflectionStep {
        question: "O que está mais pesado na sua mente agora?",
        placeholder: "Ex: Não consigo começar a trabalhar...",
        template: "Obrigado por compartilhar sobre \"{answer}\". Reconhecer o peso já é um passo.",
    },
    ReflectionStep {
        question: "Como está seu nível de energia, de 0 a 10?",
        placeholder: "Apenas um número...",
        template: "Nível de energia {answer}, anotado. Isso nos dá um contexto importante.",
    },
    ReflectionStep {
        question: "Qual é a emoção principal que você está sentindo?",
        placeholder: "Ex: ansiedade, tristeza, frustração...",
        template: "Nomear a emoção \"{answer}\" é uma ferramenta poderosa. Você está no caminho certo.",
    },
    ReflectionStep {
        question: "Qual pensamento autocrítico está passando pela sua cabeça?",
        placeholder: "Ex: 'Eu sou um fracasso'...",
        template: "Identificar o pensamento \"{answer}\" ajuda a separá-lo da sua identidade. Lembre-se: você não é seus pensamentos.",
    },
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReflectionOutcome {
    pub step: usize,
    pub insight: String,
    /// Index of the next question, absent once the path is complete.
    pub next_step: Option<usize>,
    pub next_question: Option<&'static str>,
    pub complete: bool,
}

/// `None` when `step` is past the end of the path.
pub fn answer(step: usize, answer: &str) -> Option<ReflectionOutcome> {
    let current = REFLECTION_PATH.get(step)?;
    let next = REFLECTION_PATH.get(step + 1);
    Some(ReflectionOutcome {
        step,
        insight: current.insight(answer),
        next_step: next.map(|_| step + 1),
        next_question: next.map(|s| s.question),
        complete: next.is_none(),
    })
}
