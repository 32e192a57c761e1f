//! Canned-response chat companion.
//!
//! Replies come from keyword buckets checked in a fixed order; each bucket
//! holds three interchangeable replies and one is picked at random.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::mentions_any;

pub const GREETING: &str =
    "Olá! Sou seu companheiro de conversa. Como posso te ajudar a clarear as coisas hoje?";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyTopic {
    Procrastination,
    Focus,
    Overwhelm,
    Gratitude,
    General,
}

struct ReplyBucket {
    topic: ReplyTopic,
    keywords: &'static [&'static str],
    replies: [&'static str; 3],
}

static BUCKETS: [ReplyBucket; 4] = [
    ReplyBucket {
        topic: ReplyTopic::Procrastination,
        keywords: &["procrastinando", "sem vontade", "sem energia", "não consigo começar", "paralisado"],
        replies: [
            "Totalmente compreensível. Vamos quebrar essa inércia com algo mínimo. Que tal apenas se levantar e esticar o corpo por 30 segundos? O que acha?",
            "Essa sensação é super comum. Vamos enganar o cérebro. Escolha UMA coisa, a mais fácil da sua lista, e faça só por 1 minuto. Qual seria essa micro-tarefa?",
            "Entendo. A energia não aparece do nada. Que tal um passo físico? Pegar um copo d'água ou abrir a janela. Qual dos dois parece mais fácil agora?",
        ],
    },
    ReplyBucket {
        topic: ReplyTopic::Focus,
        keywords: &["foco", "distraído", "não consigo concentrar", "perdido nas tarefas"],
        replies: [
            "Ok, o cérebro está pulando por aí. Vamos simplificar. Qual é a ÚNICA tarefa que, se feita, já faria seu dia melhor? Apenas uma.",
            "Acontece. Vamos trazer o foco para o presente. Olhe ao seu redor e me diga uma coisa que você pode arrumar em menos de 10 segundos. O que seria?",
            "É difícil focar quando tudo parece importante. Que tal escolhermos a tarefa mais rápida da sua lista, só para sentir a vitória? Qual poderia ser?",
        ],
    },
    ReplyBucket {
        topic: ReplyTopic::Overwhelm,
        keywords: &["ansioso", "sobrecarregado", "muita coisa", "não sei por onde começar"],
        replies: [
            "Respira. Essa sensação de avalanche é real. Vamos ignorar a lista toda por um instante. Qual é a coisa mais URGENTE, se houver alguma?",
            "Ok, é muita informação. Vamos fazer um 'brain dump' rápido. Me diga 3 coisas que estão pesando mais. Só três, por enquanto.",
            "Entendo. Quando a mente está cheia, o corpo paralisa. Vamos focar no físico: que tal colocar uma música que você gosta e só ouvir por um minuto? Qual música seria?",
        ],
    },
    ReplyBucket {
        topic: ReplyTopic::Gratitude,
        keywords: &["obrigado", "ajudou", "valeu", "consegui"],
        replies: [
            "Que bom ouvir isso! Fico feliz em ajudar. Qual o próximo pequeno passo?",
            "Você que fez o trabalho duro! Fico feliz em ser um apoio. Como se sente agora?",
            "Excelente! Celebrar pequenas vitórias é fundamental. O que podemos fazer a seguir?",
        ],
    },
];

static GENERAL_REPLIES: [&str; 3] = [
    "Entendido. Obrigado por compartilhar. O que está passando pela sua cabeça agora que mais te incomoda?",
    "Ok, estou aqui com você. Qual é o principal obstáculo que você está sentindo neste exato momento?",
    "Certo. Se você pudesse mudar uma coisinha no seu ambiente agora para se sentir melhor, o que seria?",
];

pub fn classify(message: &str) -> ReplyTopic {
    BUCKETS
        .iter()
        .find(|bucket| mentions_any(message, bucket.keywords))
        .map(|bucket| bucket.topic)
        .unwrap_or(ReplyTopic::General)
}

pub fn replies_for(topic: ReplyTopic) -> &'static [&'static str] {
    BUCKETS
        .iter()
        .find(|bucket| bucket.topic == topic)
        .map(|bucket| &bucket.replies[..])
        .unwrap_or(&GENERAL_REPLIES)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CannedReply {
    pub topic: ReplyTopic,
    pub content: &'static str,
}

pub fn reply_to<R: Rng + ?Sized>(message: &str, rng: &mut R) -> CannedReply {
    let topic = classify(message);
    let content = replies_for(topic)
        .choose(rng)
        .copied()
        .unwrap_or(GENERAL_REPLIES[0]);
    CannedReply { topic, content }
}
