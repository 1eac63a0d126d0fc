//! Built-in question pool, used when no external pool is supplied or the
//! supplied one fails validation.

use super::types::Question;

type Entry = (&'static str, &'static str, [&'static str; 4], usize);

const DEFAULT_QUESTIONS: [Entry; 15] = [
    (
        "Flour Power",
        "Which city was the 'Flour Milling Capital of the World'?",
        ["Duluth", "Minneapolis", "St. Paul", "Rochester"],
        1,
    ),
    (
        "Fur Trade",
        "Which animal pelt was most prized by Voyageurs?",
        ["Bear", "Deer", "Beaver", "Wolf"],
        2,
    ),
    (
        "Iron Giants",
        "Name the largest Iron Range in MN.",
        ["Mesabi", "Cuyuna", "Vermilion", "Gunflint"],
        0,
    ),
    (
        "State Seal",
        "The phrase 'L'Etoile du Nord' means:",
        ["Land of Lakes", "Star of the North", "True North", "Cold Waters"],
        1,
    ),
    (
        "First People",
        "Which group lived in MN forests before the Ojibwe arrived?",
        ["Dakota", "Iroquois", "Apache", "Inuit"],
        0,
    ),
    (
        "Water Source",
        "Lake Itasca is the source of which river?",
        ["Minnesota", "St. Croix", "Mississippi", "Red"],
        2,
    ),
    (
        "Early Politics",
        "Who was Minnesota's first state governor?",
        ["Alexander Ramsey", "Henry Sibley", "Knute Nelson", "Hubert Humphrey"],
        1,
    ),
    (
        "Transport",
        "What was the Red River Cart known for?",
        ["Its speed", "Its squeaky wheels", "Its iron frame", "Floating"],
        1,
    ),
    (
        "Conflict",
        "The US-Dakota War took place in which year?",
        ["1812", "1862", "1900", "1776"],
        1,
    ),
    (
        "Immigration",
        "Which European group settled heavily in MN in the late 1800s?",
        ["Italians", "Scandinavians", "Spanish", "Greeks"],
        1,
    ),
    (
        "Civil War",
        "MN was the first state to offer troops to the Union. Which regiment is famous?",
        ["1st Minnesota", "Iron Brigade", "Rough Riders", "Green Mountain Boys"],
        0,
    ),
    (
        "Folklore",
        "Who is the legendary giant lumberjack of MN folklore?",
        ["Pecos Bill", "John Henry", "Paul Bunyan", "Johnny Appleseed"],
        2,
    ),
    (
        "Geography",
        "What is the largest lake entirely within Minnesota?",
        ["Mille Lacs", "Red Lake", "Leech Lake", "Lake Minnetonka"],
        1,
    ),
    (
        "Capital City",
        "Which city is the capital of Minnesota?",
        ["Minneapolis", "St. Paul", "Duluth", "Bloomington"],
        1,
    ),
    (
        "Territory",
        "Before statehood, MN was a territory. In what year did it become a territory?",
        ["1849", "1858", "1800", "1890"],
        0,
    ),
];

pub fn default_pool() -> Vec<Question> {
    DEFAULT_QUESTIONS
        .iter()
        .map(|(title, prompt, options, correct)| Question {
            title: title.to_string(),
            prompt: prompt.to_string(),
            options: options.map(str::to_string),
            correct: *correct,
        })
        .collect()
}
