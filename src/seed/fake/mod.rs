//! Brazilian-style fake data: person, company and farm names plus documents.

mod documents;

pub use documents::{cnpj, cpf, is_valid_cnpj, is_valid_cpf};

use crate::models::ProducerKind;
use crate::sampling::ValueProvider;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Antônio", "Beatriz", "Carlos", "Cláudia", "Daniel", "Eduarda", "Fernando", "Gabriela",
    "Gustavo", "Helena", "João", "José", "Juliana", "Larissa", "Lucas", "Luiz", "Márcia", "Maria",
    "Mateus", "Paulo", "Pedro", "Rafael", "Renata", "Sandra", "Thiago", "Vitória",
];

const SURNAMES: &[&str] = &[
    "Almeida", "Alves", "Barbosa", "Cardoso", "Carvalho", "Costa", "Dias", "Fernandes", "Ferreira",
    "Gomes", "Lima", "Martins", "Melo", "Oliveira", "Pereira", "Ribeiro", "Rocha", "Rodrigues",
    "Santos", "Silva", "Souza", "Teixeira", "Vieira",
];

const COMPANY_STEMS: &[&str] = &[
    "Agropecuária", "Agroindustrial", "Grãos", "Sementes", "Cerealista", "Agrícola", "Pecuária",
    "Cooperativa Agrícola",
];

const COMPANY_SUFFIXES: &[&str] = &["Ltda", "S.A.", "ME", "EIRELI"];

const FARM_PREFIXES: &[&str] = &["Fazenda", "Sítio", "Estância", "Chácara", "Granja"];

const FARM_NAMES: &[&str] = &[
    "Boa Vista", "Santa Maria", "São José", "Bela Vista", "Santa Helena", "Primavera",
    "Três Irmãos", "Água Limpa", "Recanto Verde", "Esperança", "Santo Antônio", "Bom Retiro",
    "Ouro Verde", "Palmeiras", "Sol Nascente", "Rio Claro",
];

// Lists above are non-empty, so the index is always in range.
fn choose(values: &mut dyn ValueProvider, items: &[&'static str]) -> &'static str {
    items[values.index(items.len())]
}

pub fn person_name(values: &mut dyn ValueProvider) -> String {
    let first = choose(values, FIRST_NAMES);
    let middle = choose(values, SURNAMES);
    let last = choose(values, SURNAMES);
    format!("{first} {middle} {last}")
}

pub fn company_name(values: &mut dyn ValueProvider) -> String {
    let owner = choose(values, SURNAMES);
    let stem = choose(values, COMPANY_STEMS);
    let suffix = choose(values, COMPANY_SUFFIXES);
    format!("{stem} {owner} {suffix}")
}

pub fn farm_name(values: &mut dyn ValueProvider) -> String {
    let prefix = choose(values, FARM_PREFIXES);
    let name = choose(values, FARM_NAMES);
    format!("{prefix} {name}")
}

/// Name matching the producer kind.
pub fn producer_name(values: &mut dyn ValueProvider, kind: ProducerKind) -> String {
    match kind {
        ProducerKind::Individual => person_name(values),
        ProducerKind::Company => company_name(values),
    }
}

/// CPF for individuals, CNPJ for companies.
pub fn document(values: &mut dyn ValueProvider, kind: ProducerKind) -> String {
    match kind {
        ProducerKind::Individual => cpf(values),
        ProducerKind::Company => cnpj(values),
    }
}
