//! Static reference data inserted on first start.

/// (goal, day, meal, dish, calories)
pub const MEAL_PLANS: &[(&str, &str, &str, &str, i64)] = &[
    ("Похудение", "Понедельник", "Завтрак", "Овсянка с ягодами", 250),
    ("Похудение", "Понедельник", "Обед", "Греческий салат с курицей", 400),
    ("Похудение", "Понедельник", "Ужин", "Запеченная рыба с овощами", 350),
    ("Похудение", "Вторник", "Завтрак", "Омлет из белков с овощами", 200),
    ("Похудение", "Вторник", "Обед", "Суп из чечевицы", 300),
    ("Похудение", "Вторник", "Ужин", "Индейка на гриле с брокколи", 350),
    ("Набор массы", "Понедельник", "Завтрак", "Омлет из 4 яиц с сыром и авокадо", 600),
    ("Набор массы", "Понедельник", "Перекус 1", "Протеиновый коктейль с бананом", 350),
    ("Набор массы", "Понедельник", "Обед", "Куриная грудка с рисом и овощами", 700),
    ("Набор массы", "Понедельник", "Перекус 2", "Творог с орехами и медом", 400),
    ("Набор массы", "Понедельник", "Ужин", "Стейк с картофелем", 800),
    ("Набор массы", "Вторник", "Завтрак", "Овсянка с арахисовым маслом и бананом", 550),
    ("Набор массы", "Вторник", "Перекус 1", "Бутерброд с индейкой и сыром", 300),
    ("Набор массы", "Вторник", "Обед", "Паста с фрикадельками", 750),
    ("Набор массы", "Вторник", "Перекус 2", "Йогурт с гранолой", 300),
    ("Набор массы", "Вторник", "Ужин", "Лосось с киноа", 650),
    ("Поддержание веса", "Понедельник", "Завтрак", "Гранола с йогуртом и фруктами", 400),
    ("Поддержание веса", "Понедельник", "Обед", "Сэндвич с индейкой и овощами", 450),
    ("Поддержание веса", "Понедельник", "Ужин", "Киноа с запеченными овощами", 500),
    ("Поддержание веса", "Вторник", "Завтрак", "Тосты с авокадо и яйцом", 450),
    ("Поддержание веса", "Вторник", "Обед", "Куриный салат с орехами", 500),
    ("Поддержание веса", "Вторник", "Ужин", "Запеченная рыба с бататом", 400),
];

/// A seeded recipe together with its ingredient lines
#[derive(Debug, Clone, Copy)]
pub struct SeedRecipe {
    pub meal_type: &'static str,
    pub name: &'static str,
    pub instructions: &'static str,
    pub calories: &'static str,
    pub image_url: &'static str,
    pub ingredients: &'static [&'static str],
}

pub const RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        meal_type: "Завтрак",
        name: "Омлет с овощами и сыром",
        instructions: "1. Взбейте яйца в миске.\n2. Нарежьте овощи и добавьте к яйцам.\n3. Посыпьте тертым сыром, добавьте специи.\n4. Жарьте на среднем огне до готовности.",
        calories: "Около 350 ккал",
        image_url: "https://img1.russianfood.com/dycontent/images_upl/390/big_389184.jpg",
        ingredients: &[
            "3 яйца",
            "50г сыра",
            "1 помидор",
            "1/2 болгарского перца",
            "зелень",
            "соль, перец",
        ],
    },
    SeedRecipe {
        meal_type: "Обед",
        name: "Греческий салат с курицей",
        instructions: "1. Нарежьте овощи, сыр и оливки.\n2. Приготовьте курицу на гриле и нарежьте.\n3. Смешайте все ингредиенты.\n4. Заправьте оливковым маслом и лимонным соком, посыпьте орегано.",
        calories: "Около 400 ккал",
        image_url: "https://static.1000.menu/img/content-v2/eb/79/22217/grecheskii-salat-s-kuricei_1589111068_12_max.jpg",
        ingredients: &[
            "150г куриной грудки",
            "1 огурец",
            "1 помидор",
            "50г феты",
            "10 оливок",
            "оливковое масло",
            "лимонный сок",
            "орегано",
        ],
    },
    SeedRecipe {
        meal_type: "Ужин",
        name: "Запеченный лосось с овощами",
        instructions: "1. Нарежьте овощи и выложите на противень.\n2. Полейте оливковым маслом, посолите и поперчите.\n3. Сверху положите филе лосося.\n4. Сбрызните лимонным соком и посыпьте зеленью.\n5. Запекайте при 180°C в течение 20 минут.",
        calories: "Около 380 ккал",
        image_url: "https://img.povar.ru/main/43/7f/e9/fc/zapechennii_losos_s_ovoshami-404089.jpg",
        ingredients: &[
            "150г филе лосося",
            "цукини",
            "болгарский перец",
            "морковь",
            "лук",
            "оливковое масло",
            "лимон",
            "зелень",
            "соль, перец",
        ],
    },
    SeedRecipe {
        meal_type: "Десерт",
        name: "Протеиновые панкейки с ягодами",
        instructions: "1. Смешайте банан, яйца и протеин в блендере.\n2. Жарьте на антипригарной сковороде небольшими порциями.\n3. Подавайте с ягодами и корицей.",
        calories: "Около 250 ккал",
        image_url: "https://fitbreak.ru/wp-content/uploads/2021/05/belkovye-pankejki.jpg",
        ingredients: &[
            "1 банан",
            "2 яйца",
            "30г протеинового порошка",
            "100г ягод",
            "корица",
        ],
    },
    SeedRecipe {
        meal_type: "Напиток",
        name: "Протеиновый смузи",
        instructions: "1. Смешайте все ингредиенты в блендере до однородной массы.\n2. При необходимости добавьте лед.",
        calories: "Около 300 ккал",
        image_url: "https://edaplus.info/food_pictures/protein-smoothie.jpg",
        ingredients: &[
            "1 банан",
            "200мл молока",
            "150г ягод",
            "30г протеинового порошка",
            "1 ст.л. меда",
        ],
    },
];

/// (name, calories, protein, fats, carbs) per 100g
pub const FOODS: &[(&str, f64, f64, f64, f64)] = &[
    ("курица", 165.0, 31.0, 3.6, 0.0),
    ("рис", 130.0, 2.7, 0.3, 28.0),
    ("гречка", 143.0, 5.7, 1.1, 25.0),
    ("овсянка", 68.0, 2.4, 1.4, 12.0),
    ("яйцо", 72.0, 6.3, 5.0, 0.4),
    ("молоко", 42.0, 2.8, 1.0, 4.7),
    ("творог", 103.0, 18.0, 1.8, 3.3),
    ("говядина", 187.0, 26.0, 9.9, 0.0),
    ("свинина", 242.0, 22.0, 16.5, 0.0),
    ("картофель", 77.0, 2.0, 0.1, 16.3),
    ("морковь", 41.0, 0.9, 0.2, 8.7),
    ("яблоко", 52.0, 0.3, 0.4, 11.8),
    ("банан", 96.0, 1.1, 0.2, 21.8),
    ("хлеб", 265.0, 7.5, 1.0, 53.4),
    ("сыр", 363.0, 24.0, 29.5, 0.3),
    ("макароны", 344.0, 10.4, 1.1, 69.7),
    ("масло", 748.0, 0.5, 82.5, 0.9),
    ("рыба", 144.0, 19.8, 7.6, 0.0),
    ("греческий йогурт", 59.0, 10.0, 0.4, 3.6),
];

pub const HEALTH_TIPS: &[&str] = &[
    "Питайся разнообразно и сбалансированно.",
    "Уделяй достаточно времени на приготовление пищи.",
    "Не переедай и не пропускай приемы пищи.",
    "Пей достаточно воды и других жидкостей.",
    "Делай физические упражнения регулярно.",
    "Следи за своим сном и стрессом.",
];
