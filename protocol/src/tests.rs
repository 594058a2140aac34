#[cfg(test)]
mod tests {
    use crate::graphql::{
        GraphqlRequest, GraphqlResponse, PokemonFilterInput, PokemonsData, PokemonsQueryInput,
        PokemonsVariables, queries,
    };
    use crate::{ParseError, decode, pokeapi, rest};

    #[test]
    fn test_decode_rest_list() {
        let body = r#"{
            "limit": 2,
            "offset": 0,
            "count": 151,
            "items": [
                {"id": "001", "number": 1, "name": "Bulbasaur", "image": "b.png",
                 "isFavorite": true, "types": ["Grass", "Poison"], "maxCP": 951, "maxHP": 1071},
                {"id": "004", "number": 4, "name": "Charmander", "image": "c.png",
                 "isFavorite": false, "types": ["Fire"]}
            ]
        }"#;

        let list: rest::ListResponse = decode(body).unwrap();

        assert_eq!(list.count, 151);
        assert_eq!(list.items.len(), 2);
        assert!(list.items[0].is_favorite);
        assert_eq!(list.items[0].max_cp, Some(951));
        assert_eq!(list.items[1].types, vec!["Fire".to_string()]);
        assert_eq!(list.items[1].max_hp, None);
    }

    #[test]
    fn test_decode_rest_detail_with_evolutions() {
        let body = r#"{
            "id": "002", "number": 2, "name": "Ivysaur", "image": "i.png",
            "isFavorite": false, "types": ["Grass", "Poison"],
            "weight": {"minimum": "11.38kg", "maximum": "14.63kg"},
            "height": {"minimum": "0.88m", "maximum": "1.13m"},
            "evolutions": [{"id": "003", "name": "Venusaur", "image": "v.png", "types": ["Grass"], "isFavorite": false}],
            "previousEvolutions": [{"id": "001", "name": "Bulbasaur", "image": "b.png", "types": ["Grass"], "isFavorite": false}],
            "maxCP": 1483, "maxHP": 1632, "sound": "/sounds/2"
        }"#;

        let detail: rest::PokemonDetail = decode(body).unwrap();

        assert_eq!(detail.pokemon.name, "Ivysaur");
        assert_eq!(detail.evolutions[0].id, "003");
        assert_eq!(detail.previous_evolutions[0].name, "Bulbasaur");
        assert_eq!(detail.weight.unwrap().maximum, "14.63kg");
    }

    #[test]
    fn test_decode_empty_body() {
        let result: Result<rest::ListResponse, _> = decode("   ");
        assert_eq!(result.unwrap_err(), ParseError::EmptyResponse);
    }

    #[test]
    fn test_decode_invalid_json() {
        let result: Result<rest::ListResponse, _> = decode("{\"limit\": ");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_pokeapi_type_names_ordered_by_slot() {
        let body = r#"{
            "id": 6, "name": "charizard",
            "types": [
                {"slot": 2, "type": {"name": "flying", "url": "https://pokeapi.co/api/v2/type/3/"}},
                {"slot": 1, "type": {"name": "fire", "url": "https://pokeapi.co/api/v2/type/10/"}}
            ],
            "sprites": {"front_default": "front.png", "other": {"official-artwork": {"front_default": "art.png"}}},
            "stats": [{"base_stat": 78, "effort": 0, "stat": {"name": "hp", "url": "u"}}],
            "height": 17, "weight": 905
        }"#;

        let pokemon: pokeapi::Pokemon = decode(body).unwrap();

        assert_eq!(pokemon.type_names(), vec!["fire", "flying"]);
        assert_eq!(pokemon.sprites.best_image(), Some("art.png"));
        assert_eq!(pokemon.stats[0].base_stat, 78);
    }

    #[test]
    fn test_pokeapi_sprite_fallback() {
        let body = r#"{"id": 10, "name": "caterpie", "types": [], "sprites": {"front_default": "front.png"}}"#;

        let pokemon: pokeapi::Pokemon = decode(body).unwrap();

        assert_eq!(pokemon.sprites.best_image(), Some("front.png"));
    }

    #[test]
    fn test_pokeapi_evolution_chain() {
        let body = r#"{
            "id": 67,
            "chain": {
                "species": {"name": "eevee", "url": "https://pokeapi.co/api/v2/pokemon-species/133/"},
                "evolves_to": [
                    {"species": {"name": "vaporeon", "url": "https://pokeapi.co/api/v2/pokemon-species/134/"}, "evolves_to": []},
                    {"species": {"name": "jolteon", "url": "https://pokeapi.co/api/v2/pokemon-species/135/"}, "evolves_to": []}
                ]
            }
        }"#;

        let chain: pokeapi::EvolutionChain = decode(body).unwrap();

        assert_eq!(chain.chain.species.name, "eevee");
        assert_eq!(chain.chain.evolves_to.len(), 2);
        assert_eq!(chain.chain.evolves_to[1].species.name, "jolteon");
    }

    #[test]
    fn test_graphql_request_serialization() {
        let request = GraphqlRequest {
            query: queries::GET_POKEMONS,
            operation_name: "GetPokemons",
            variables: PokemonsVariables {
                query: PokemonsQueryInput {
                    limit: 20,
                    offset: 40,
                    search: None,
                    filter: PokemonFilterInput {
                        kind: Some("Water".to_string()),
                        is_favorite: None,
                    },
                },
            },
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["operationName"], "GetPokemons");
        assert_eq!(json["variables"]["query"]["offset"], 40);
        assert_eq!(json["variables"]["query"]["filter"]["type"], "Water");
        assert!(json["variables"]["query"].get("search").is_none());
        assert!(json["variables"]["query"]["filter"].get("isFavorite").is_none());
    }

    #[test]
    fn test_graphql_response_data() {
        let body = r#"{"data": {"pokemons": {"limit": 20, "offset": 0, "count": 1,
            "edges": [{"id": "025", "number": 25, "name": "Pikachu", "image": "p.png",
                       "types": ["Electric"], "isFavorite": false, "maxCP": 777, "maxHP": 887}]}}}"#;

        let response: GraphqlResponse<PokemonsData> = decode(body).unwrap();
        let data = response.into_data().unwrap();

        assert_eq!(data.pokemons.count, 1);
        assert_eq!(data.pokemons.edges[0].name, "Pikachu");
    }

    #[test]
    fn test_graphql_response_errors() {
        let body = r#"{"data": null, "errors": [{"message": "boom"}, {"message": "again"}]}"#;

        let response: GraphqlResponse<PokemonsData> = decode(body).unwrap();

        assert_eq!(
            response.into_data().unwrap_err(),
            ParseError::InvalidFormat("boom; again".to_string())
        );
    }

    #[test]
    fn test_graphql_response_missing_data() {
        let body = r#"{"data": null}"#;

        let response: GraphqlResponse<PokemonsData> = decode(body).unwrap();

        assert_eq!(
            response.into_data().unwrap_err(),
            ParseError::MissingField("data".to_string())
        );
    }
}
