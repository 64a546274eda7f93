//! Reply templates

use crate::handlers::commands::Command;

pub const NOT_UNDERSTOOD: &str = "Кошмарики, я ничего не поняла....";
pub const ENTER_PLACE_NAME: &str = "Введите название места, куда нам обязательно нужно съездить!";
pub const EMPTY_PLACE_NAME: &str =
    "Название не может быть пустым! Введите название места, куда нам обязательно нужно съездить!";
pub const ENTER_PRIORITY: &str = "Введите приоритет места, любое число, чем больше тем важнее!";
pub const NOT_A_NUMBER: &str = "Это не число!";
pub const PLACE_ADDED: &str = "Местечко успешно добавлено!";
pub const PLACES_HEADER: &str = "Вот список всех мест";
pub const SOMETHING_WENT_WRONG: &str = "Ой, что-то пошло не так. Попробуйте ещё раз позже.";

pub fn welcome_new(nickname: &str) -> String {
    format!(
        "Привет, @{}! Я-Ленабот!\nНажмите {}, чтобы добавить местечко куда нам нужно сходити!\nНажмите {}, чтобы увидеть весь список таких местечек",
        nickname,
        Command::AddPlace.trigger(),
        Command::Places.trigger()
    )
}

pub fn welcome_back(nickname: &str) -> String {
    format!("Привет, @{}! Давно не виделись!", nickname)
}
