//! User-facing titles and messages for failures.
//!
//! Every error the CLI can surface maps to one [`UserMessage`]. Text is in
//! Brazilian Portuguese, the language of the condominium front end.

use crate::domain::{
    Error, ErrorCode, PetValidationError, ResidentValidationError, ValidationError,
};

use super::commands::CommandError;

/// Title and body shown for a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    /// Short heading.
    pub title: String,
    /// One or two sentences telling the user what to do next.
    pub body: String,
}

impl UserMessage {
    fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_owned(),
            body: body.to_owned(),
        }
    }
}

/// Message for a domain error, selected by its code.
pub fn for_domain_error(error: &Error) -> UserMessage {
    match error.code() {
        ErrorCode::AccessDenied => UserMessage::new(
            "Acesso Negado",
            "Faça login para cadastrar pets.",
        ),
        ErrorCode::EmailUnconfirmed => UserMessage::new(
            "E-mail Não Confirmado",
            "Por favor, confirme seu e-mail antes de cadastrar pets. Verifique sua caixa de entrada e spam.",
        ),
        ErrorCode::InvalidCredentials => UserMessage::new(
            "Credenciais Inválidas",
            "E-mail ou senha incorretos. Verifique suas credenciais e tente novamente.",
        ),
        ErrorCode::Unconfirmed => UserMessage::new(
            "E-mail Não Confirmado",
            "Por favor, confirme seu e-mail antes de fazer login. Verifique sua caixa de entrada e spam.",
        ),
        ErrorCode::AlreadyRegistered => UserMessage::new(
            "Usuário Já Cadastrado",
            "Este e-mail já está cadastrado. Tente fazer login ou use outro e-mail.",
        ),
        ErrorCode::WeakPassword => UserMessage::new(
            "Senha Muito Curta",
            "A senha deve ter pelo menos 6 caracteres.",
        ),
        ErrorCode::InvalidEmail => UserMessage::new(
            "E-mail Inválido",
            "Por favor, insira um endereço de e-mail válido.",
        ),
        ErrorCode::RateLimited => UserMessage::new(
            "Muitas Tentativas",
            "Muitas tentativas. Aguarde alguns minutos e tente novamente.",
        ),
        ErrorCode::Network => UserMessage::new(
            "Erro de Conexão",
            "Erro de conexão. Verifique sua internet e tente novamente.",
        ),
        ErrorCode::Persistence => UserMessage::new(
            "Erro ao Cadastrar Pet",
            "Erro ao cadastrar pet. Tente novamente.",
        ),
        ErrorCode::InvalidRequest => UserMessage::new(
            "Dados Inválidos",
            "Revise os dados informados e tente novamente.",
        ),
        _ => UserMessage::new("Erro Inesperado", "Ocorreu um erro inesperado. Tente novamente."),
    }
}

fn for_validation_error(error: &ValidationError) -> UserMessage {
    let body = match error {
        ValidationError::Resident(ResidentValidationError::EmptyName) => {
            "Informe o nome do morador."
        }
        ValidationError::Resident(ResidentValidationError::EmptyBlock) => "Informe o bloco.",
        ValidationError::Resident(ResidentValidationError::EmptyApartment) => {
            "Informe o apartamento."
        }
        ValidationError::Resident(ResidentValidationError::InvalidPhone) => {
            "Informe um telefone com DDD (10 ou 11 dígitos)."
        }
        ValidationError::Resident(ResidentValidationError::InvalidEmail) => {
            "Informe um e-mail de contato válido."
        }
        ValidationError::Pet(PetValidationError::EmptyName) => "Informe o nome do pet.",
        ValidationError::Pet(PetValidationError::EmptySpecies) => "Selecione a espécie.",
        ValidationError::Pet(PetValidationError::EmptyBreed) => "Informe a raça.",
        ValidationError::Pet(PetValidationError::AgeOutOfRange { .. }) => {
            "A idade deve estar entre 0 e 30 anos."
        }
    };
    UserMessage::new("Formulário Incompleto", body)
}

/// Message for any command failure.
pub fn for_command_error(error: &CommandError) -> UserMessage {
    match error {
        CommandError::Domain(inner) => for_domain_error(inner),
        CommandError::Form(inner) => for_validation_error(inner),
        CommandError::Credentials(_) => UserMessage::new(
            "Dados de Acesso Inválidos",
            "Informe um e-mail válido e uma senha.",
        ),
        CommandError::Image(_) => UserMessage::new(
            "Erro ao Processar Imagem",
            "Erro ao processar a imagem. Tente novamente.",
        ),
        CommandError::Read { .. } | CommandError::Write { .. } => UserMessage::new(
            "Erro de Arquivo",
            "Não foi possível acessar o arquivo informado.",
        ),
        CommandError::Setup(_) => UserMessage::new(
            "Configuração Ausente",
            "Defina PETCONDO_SUPABASE_URL e PETCONDO_SUPABASE_ANON_KEY.",
        ),
    }
}
