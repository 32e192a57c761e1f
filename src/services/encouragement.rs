use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Encouragement {
    pub message: &'static str,
    pub suggestion: &'static str,
}

pub static ENCOURAGEMENTS: [Encouragement; 3] = [
    Encouragement {
        message: "Você está aqui, tentando. Isso já é uma vitória.",
        suggestion: "Celebre cada pequeno esforço hoje.",
    },
    Encouragement {
        message: "Seus sentimentos são válidos, mesmo que sejam difíceis.",
        suggestion: "Respire fundo. Você está seguro(a) aqui.",
    },
    Encouragement {
        message: "Progresso não é linear. Está tudo bem não estar bem.",
        suggestion: "Que tal fazer uma pequena pausa e fazer algo que você gosta?",
    },
];

pub const TWO_MINUTE_TIP: &str = "Quando sentir que não consegue começar, tente a regra dos 2 minutos: comprometa-se com apenas 2 minutos da tarefa. Geralmente isso é suficiente para quebrar a inércia.";

pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Encouragement {
    *ENCOURAGEMENTS.choose(rng).unwrap_or(&ENCOURAGEMENTS[0])
}
