// src/common/i18n.rs

use crate::middleware::i18n::Locale;

// ---
// Chaves das mensagens exibidas ao usuário final ("displayMessage").
// A mensagem interna (em `AppError`) é para logs e para quem integra a API;
// esta aqui é a que o app mostra na tela.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Unauthorized,
    TokenExpired,
    InvalidData,
    NotAuthorized,
    NotAPetshop,
    NotAWorker,
    NotAClient,
    OnlyPetshopCanAddClients,
    OnlyPetshopCanUpdateClients,
    OnlyPetshopCanAddWorkers,
    OnlyPetshopCanUpdateWorkers,
    EmailInUse,
    ClientAlreadyAdded,
    ClientNotFound,
    ClientCannotBeUpdated,
    ClientNotInPetshop,
    AddressNotOwned,
    PetNotFound,
    WorkerNotFound,
    WorkerCannotBeUpdated,
    WorkerNotInPetshop,
    WorkerNotAtPetshop,
    UserNotFound,
    UserOrAddressNotFound,
    PetshopIdRequired,
    ConfigurationNotFound,
    ConfigurationAlreadyExists,
    ResponsiblePersonNotFound,
    ResponsiblePersonAlreadyExists,
    ClientOrPetNotFound,
    DeliveryWithoutAddress,
    DeliveryValueMismatch,
    PaymentThroughAppNotAllowed,
    PaymentOutsideAppNotAllowed,
    EmailRequired,
    DataNotFound,
    AlreadyRegistered,
    UnexpectedError,
}

/// Catálogo de mensagens + política de exposição de detalhes internos.
#[derive(Debug, Clone)]
pub struct I18nStore {
    expose_internal_errors: bool,
}

impl I18nStore {
    pub fn new(expose_internal_errors: bool) -> Self {
        Self { expose_internal_errors }
    }

    /// Fora de produção o corpo do erro 500 inclui o detalhe interno.
    pub fn expose_internal_errors(&self) -> bool {
        self.expose_internal_errors
    }

    pub fn translate(&self, locale: &Locale, key: MessageKey) -> &'static str {
        match locale.0.as_str() {
            "en" => english(key),
            _ => portuguese(key),
        }
    }
}

fn portuguese(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Unauthorized => "Credenciais inválidas.",
        MessageKey::TokenExpired => "Sessão expirada. Faça login novamente.",
        MessageKey::InvalidData => "Um ou mais campos são inválidos.",
        MessageKey::NotAuthorized => "Não autorizado.",
        MessageKey::NotAPetshop => "Não autorizado. Usuário não é Petshop.",
        MessageKey::NotAWorker => "Não autorizado. Usuário não é um colaborador.",
        MessageKey::NotAClient => "Não autorizado. Somente um cliente pode acessar esses dados.",
        MessageKey::OnlyPetshopCanAddClients => {
            "Não autorizado. Somente um petshop pode adicionar clientes."
        }
        MessageKey::OnlyPetshopCanUpdateClients => {
            "Não autorizado. Somente o petshop ou o próprio cliente podem atualizar os dados de um cliente."
        }
        MessageKey::OnlyPetshopCanAddWorkers => {
            "Não autorizado. Somente um petshop pode adicionar colaboradores."
        }
        MessageKey::OnlyPetshopCanUpdateWorkers => {
            "Não autorizado. Somente o petshop pode atualizar os dados de um colaborador."
        }
        MessageKey::EmailInUse => {
            "Este e-mail já está sendo usado. Peça para o(a) cliente escolher outro."
        }
        MessageKey::ClientAlreadyAdded => "Você já cadastrou esse e-mail.",
        MessageKey::ClientNotFound => "Cliente não encontrado.",
        MessageKey::ClientCannotBeUpdated => "Cliente não pode ser atualizado.",
        MessageKey::ClientNotInPetshop => "Não autorizado. Cliente não está cadastrado no Petshop.",
        MessageKey::AddressNotOwned => {
            "Não autorizado. O endereço enviado não pertence ao cliente selecionado."
        }
        MessageKey::PetNotFound => {
            "Pet não encontrado para ser atualizado. Confira os dados e tente novamente."
        }
        MessageKey::WorkerNotFound => "Colaborador não encontrado.",
        MessageKey::WorkerCannotBeUpdated => "Colaborador não pode ser atualizado.",
        MessageKey::WorkerNotInPetshop => {
            "Não autorizado. Colaborador não está cadastrado no Petshop."
        }
        MessageKey::WorkerNotAtPetshop => "Não autorizado! O colaborador não trabalha no petshop.",
        MessageKey::UserNotFound => "Usuário não encontrado.",
        MessageKey::UserOrAddressNotFound => "Usuário ou endereço não encontrados.",
        MessageKey::PetshopIdRequired => "O id do petshop é obrigatório.",
        MessageKey::ConfigurationNotFound => "Não foram encontradas as configurações do petshop.",
        MessageKey::ConfigurationAlreadyExists => "Petshop já possui configurações cadastradas.",
        MessageKey::ResponsiblePersonNotFound => "Não foi encontrado um responsável pelo petshop.",
        MessageKey::ResponsiblePersonAlreadyExists => {
            "Petshop já tem uma pessoa responsável cadastrada."
        }
        MessageKey::ClientOrPetNotFound => "Cliente e/ou pet não encontrado.",
        MessageKey::DeliveryWithoutAddress => {
            "Valor de entrega não permitido. O endereço desse cliente não existe no sistema."
        }
        MessageKey::DeliveryValueMismatch => {
            "Valor de entrega não corresponde ao valor cadastrado para o cliente."
        }
        MessageKey::PaymentThroughAppNotAllowed => "Petshop não permite pagamento pelo app.",
        MessageKey::PaymentOutsideAppNotAllowed => "Petshop não permite pagamento fora do app.",
        MessageKey::EmailRequired => "E-mail é um campo obrigatório.",
        MessageKey::DataNotFound => "Dados não encontrados.",
        MessageKey::AlreadyRegistered => "Este registro já existe.",
        MessageKey::UnexpectedError => "Ocorreu um erro inesperado.",
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Unauthorized => "Invalid credentials.",
        MessageKey::TokenExpired => "Session expired. Please sign in again.",
        MessageKey::InvalidData => "One or more fields are invalid.",
        MessageKey::NotAuthorized => "Not authorized.",
        MessageKey::NotAPetshop => "Not authorized. User is not a petshop.",
        MessageKey::NotAWorker => "Not authorized. User is not a worker.",
        MessageKey::NotAClient => "Not authorized. Only a client can access this data.",
        MessageKey::OnlyPetshopCanAddClients => "Not authorized. Only a petshop can add clients.",
        MessageKey::OnlyPetshopCanUpdateClients => {
            "Not authorized. Only the petshop or the client can update a client."
        }
        MessageKey::OnlyPetshopCanAddWorkers => "Not authorized. Only a petshop can add workers.",
        MessageKey::OnlyPetshopCanUpdateWorkers => {
            "Not authorized. Only the petshop can update a worker."
        }
        MessageKey::EmailInUse => "This e-mail is already in use. Ask the client for another one.",
        MessageKey::ClientAlreadyAdded => "You already registered this e-mail.",
        MessageKey::ClientNotFound => "Client not found.",
        MessageKey::ClientCannotBeUpdated => "Client cannot be updated.",
        MessageKey::ClientNotInPetshop => "Not authorized. Client is not registered at the petshop.",
        MessageKey::AddressNotOwned => {
            "Not authorized. The address sent does not belong to the selected client."
        }
        MessageKey::PetNotFound => "Pet to update not found. Check the data and try again.",
        MessageKey::WorkerNotFound => "Worker not found.",
        MessageKey::WorkerCannotBeUpdated => "Worker cannot be updated.",
        MessageKey::WorkerNotInPetshop => "Not authorized. Worker is not registered at the petshop.",
        MessageKey::WorkerNotAtPetshop => "Not authorized! The worker does not work at the petshop.",
        MessageKey::UserNotFound => "User not found.",
        MessageKey::UserOrAddressNotFound => "User or address not found.",
        MessageKey::PetshopIdRequired => "The petshop id is required.",
        MessageKey::ConfigurationNotFound => "Petshop configuration not found.",
        MessageKey::ConfigurationAlreadyExists => "Petshop configuration already exists.",
        MessageKey::ResponsiblePersonNotFound => "Petshop responsible person not found.",
        MessageKey::ResponsiblePersonAlreadyExists => {
            "Petshop already has a responsible person registered."
        }
        MessageKey::ClientOrPetNotFound => "Client and/or pet not found.",
        MessageKey::DeliveryWithoutAddress => {
            "Delivery value not allowed. This client has no address registered."
        }
        MessageKey::DeliveryValueMismatch => {
            "Delivery value does not match the value registered for the client."
        }
        MessageKey::PaymentThroughAppNotAllowed => "Petshop does not allow payment through the app.",
        MessageKey::PaymentOutsideAppNotAllowed => "Petshop does not allow payment outside the app.",
        MessageKey::EmailRequired => "E-mail is required.",
        MessageKey::DataNotFound => "Data not found.",
        MessageKey::AlreadyRegistered => "This record already exists.",
        MessageKey::UnexpectedError => "An unexpected error occurred.",
    }
}
